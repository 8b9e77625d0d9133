use crate::{
    config::ClientConfig,
    error::{RestyleError, Result},
    models::{ImagePayload, MediaType, Style, TransformRequestBody},
};
use reqwest::Client;
use serde::Deserialize;

pub const COULD_NOT_TRANSFORM: &str = "Could not transform the image.";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SuccessBody {
    #[serde(default)]
    transformed_base64: Option<String>,
    #[serde(default)]
    mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FailureBody {
    #[serde(default)]
    error: Option<String>,
}

/// Calls the relay from the caller's side.
#[derive(Clone)]
pub struct RelayClient {
    client: Client,
    endpoint: String,
}

impl RelayClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.endpoint.clone())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one request; never retries.
    pub async fn transform(&self, image: &ImagePayload, style: Style) -> Result<ImagePayload> {
        let body = TransformRequestBody {
            base64_image_data: &image.data,
            mime_type: image.media_type.as_str(),
            style: style.as_str(),
        };

        log::debug!("Sending {} image to {} ({})", image.media_type, self.endpoint, style);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| RestyleError::Transport(format!("relay request failed: {}", e)))?;

        let status = response.status();
        let read = response.bytes().await;

        if !status.is_success() {
            if let Err(e) = &read {
                log::warn!("Failed to read relay error body: {}", e);
            }
            let message = read
                .ok()
                .and_then(|bytes| serde_json::from_slice::<FailureBody>(&bytes).ok())
                .and_then(|b| b.error)
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
            log::warn!("Relay answered {}: {}", status.as_u16(), message);
            return Err(RestyleError::Transformation(message));
        }

        let bytes = read
            .map_err(|e| RestyleError::Transport(format!("failed to read relay response: {}", e)))?;

        let parsed: SuccessBody = serde_json::from_slice(&bytes).map_err(|e| {
            log::warn!("Relay returned an unreadable body: {}", e);
            RestyleError::Transformation(COULD_NOT_TRANSFORM.into())
        })?;

        let data = parsed
            .transformed_base64
            .filter(|d| !d.is_empty())
            .ok_or_else(|| RestyleError::Transformation(COULD_NOT_TRANSFORM.into()))?;

        let media_type = parsed
            .mime_type
            .as_deref()
            .and_then(|m| m.parse::<MediaType>().ok())
            .unwrap_or(MediaType::Png);

        Ok(ImagePayload::new(data, media_type))
    }
}
