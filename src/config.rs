use std::env;
use std::fmt;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-image-preview";
pub const DEFAULT_RELAY_ENDPOINT: &str = "http://127.0.0.1:8080/api/transform";

/// Model access credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Returns `None` for blank keys so an empty env var counts as absent.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub base_url: Option<String>,
    pub model: Option<String>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            base_url: None,
            model: None,
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        GeminiConfig {
            base_url: env::var("GEMINI_BASE_URL").ok(),
            model: env::var("GEMINI_MODEL").ok(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_GEMINI_BASE_URL)
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_GEMINI_MODEL)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub api_key: Option<ApiKey>,
    pub gemini: GeminiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: None,
            port: None,
            api_key: None,
            gemini: GeminiConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let host = env::var("HOST").ok();
        let port = env::var("PORT").ok().and_then(|port| port.parse().ok());
        let api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("API_KEY"))
            .ok()
            .and_then(ApiKey::new);

        Config {
            host,
            port,
            api_key,
            gemini: GeminiConfig::from_env(),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = ApiKey::new(key);
        self
    }

    pub fn with_gemini(mut self, gemini: GeminiConfig) -> Self {
        self.gemini = gemini;
        self
    }

    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or("127.0.0.1")
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(8080)
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            endpoint: DEFAULT_RELAY_ENDPOINT.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        match env::var("RELAY_ENDPOINT") {
            Ok(endpoint) if !endpoint.trim().is_empty() => ClientConfig { endpoint },
            _ => Self::default(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_api_key_is_absent() {
        assert!(ApiKey::new("").is_none());
        assert!(ApiKey::new("   ").is_none());
        assert_eq!(ApiKey::new("abc").unwrap().expose(), "abc");
    }

    #[test]
    fn test_api_key_debug_is_redacted() {
        let config = Config::new().with_api_key("super-secret");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("ApiKey(***)"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(config.port(), 8080);
        assert!(config.api_key.is_none());
        assert_eq!(config.gemini.model(), DEFAULT_GEMINI_MODEL);
        assert_eq!(config.gemini.base_url(), DEFAULT_GEMINI_BASE_URL);
        assert_eq!(ClientConfig::new().endpoint, DEFAULT_RELAY_ENDPOINT);
    }

    #[test]
    fn test_builders() {
        let config = Config::new()
            .with_host("0.0.0.0")
            .with_port(3000)
            .with_gemini(GeminiConfig::new().with_model("m").with_base_url("http://x"));
        assert_eq!(config.host(), "0.0.0.0");
        assert_eq!(config.port(), 3000);
        assert_eq!(config.gemini.model(), "m");
        assert_eq!(config.gemini.base_url(), "http://x");
    }
}
