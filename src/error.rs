use thiserror::Error;

#[derive(Debug, Error)]
pub enum RestyleError {
    #[error("Encoding error: {0}")]
    Encoding(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Model returned no image")]
    ModelNoOutput,
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("{0}")]
    Transformation(String),
    #[error("Server error: {0}")]
    Server(String),
}

pub const CONFIGURATION_MESSAGE: &str =
    "Server configuration error: the image model credential is not set.";
pub const NO_OUTPUT_MESSAGE: &str = "The model did not return an image. Try a different photo.";
pub const TRANSPORT_MESSAGE: &str = "Failed to transform the image. Please try again later.";

impl RestyleError {
    /// HTTP status the relay answers with for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            RestyleError::Encoding(_) | RestyleError::Validation(_) => 400,
            _ => 500,
        }
    }

    /// Client-facing text. Server-side details (transport errors, missing
    /// secrets) are replaced with fixed messages.
    pub fn public_message(&self) -> String {
        match self {
            RestyleError::Encoding(_) => "Invalid file.".to_string(),
            RestyleError::Validation(msg) | RestyleError::Transformation(msg) => msg.clone(),
            RestyleError::Configuration(_) => CONFIGURATION_MESSAGE.to_string(),
            RestyleError::ModelNoOutput => NO_OUTPUT_MESSAGE.to_string(),
            RestyleError::Transport(_) | RestyleError::Server(_) => TRANSPORT_MESSAGE.to_string(),
        }
    }
}

impl From<reqwest::Error> for RestyleError {
    fn from(e: reqwest::Error) -> Self {
        RestyleError::Transport(e.to_string())
    }
}

impl From<std::io::Error> for RestyleError {
    fn from(e: std::io::Error) -> Self {
        RestyleError::Server(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RestyleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(RestyleError::Validation("x".into()).status_code(), 400);
        assert_eq!(RestyleError::Encoding("x".into()).status_code(), 400);
        assert_eq!(RestyleError::Configuration("x".into()).status_code(), 500);
        assert_eq!(RestyleError::ModelNoOutput.status_code(), 500);
        assert_eq!(RestyleError::Transport("x".into()).status_code(), 500);
    }

    #[test]
    fn test_public_message_hides_details() {
        let err = RestyleError::Transport("connect to 10.0.0.3:443 refused".into());
        assert_eq!(err.public_message(), TRANSPORT_MESSAGE);

        let err = RestyleError::Configuration("GEMINI_API_KEY missing".into());
        assert!(!err.public_message().contains("GEMINI_API_KEY"));

        let err = RestyleError::Validation("Missing required fields: style".into());
        assert_eq!(err.public_message(), "Missing required fields: style");
    }
}
