pub mod client;

use crate::{config::ApiKey, error::Result, models::ImagePayload};
use async_trait::async_trait;

pub use client::GeminiClient;

#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub image: ImagePayload,
    pub instruction: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelPart {
    pub text: Option<String>,
    pub inline_data: Option<ImagePayload>,
}

impl ModelPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn image(image: ImagePayload) -> Self {
        Self {
            text: None,
            inline_data: Some(image),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelResponse {
    pub parts: Vec<ModelPart>,
}

impl ModelResponse {
    pub fn new(parts: Vec<ModelPart>) -> Self {
        Self { parts }
    }

    /// First part carrying inline image data, in response order.
    pub fn first_inline_image(&self) -> Option<&ImagePayload> {
        self.parts.iter().find_map(|part| part.inline_data.as_ref())
    }

    /// Text parts joined together; models sometimes explain a refusal here.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Hosted image model the relay forwards to.
#[async_trait]
pub trait ImageModel: Send + Sync {
    async fn generate(&self, api_key: &ApiKey, request: ModelRequest) -> Result<ModelResponse>;
}
