use serde::{Deserialize, Serialize};

/// Body the client sends to the relay.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformRequestBody<'a> {
    pub base64_image_data: &'a str,
    pub mime_type: &'a str,
    pub style: &'a str,
}

/// Relay-side view of the request body. Every field may be absent so that
/// validation can report exactly which ones are missing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransformRequest {
    #[serde(default)]
    pub base64_image_data: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResponse {
    pub transformed_base64: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
