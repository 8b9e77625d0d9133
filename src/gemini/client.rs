use crate::{
    config::{ApiKey, GeminiConfig},
    error::{RestyleError, Result},
    gemini::{ImageModel, ModelPart, ModelRequest, ModelResponse},
    models::{ImagePayload, MediaType},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const MAX_ERROR_BODY: usize = 500;

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url().trim_end_matches('/').to_string(),
            model: config.model().to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl ImageModel for GeminiClient {
    async fn generate(&self, api_key: &ApiKey, request: ModelRequest) -> Result<ModelResponse> {
        let body = GenerateContentRequest::from_model_request(&request);

        log::info!("Invoking model: {}", self.model);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| RestyleError::Transport(format!("model request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let mut text = response.text().await.unwrap_or_default();
            if text.len() > MAX_ERROR_BODY {
                let mut end = MAX_ERROR_BODY;
                while !text.is_char_boundary(end) {
                    end -= 1;
                }
                text.truncate(end);
            }
            return Err(RestyleError::Transport(format!(
                "model returned {}: {}",
                status.as_u16(),
                text
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| RestyleError::Transport(format!("malformed model response: {}", e)))?;

        if let Some(reason) = parsed
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            log::warn!("Model blocked the prompt: {}", reason);
        }

        Ok(parsed.into_model_response())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    #[serde(rename_all = "camelCase")]
    InlineData { inline_data: InlineDataRef<'a> },
    Text { text: &'a str },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineDataRef<'a> {
    mime_type: &'static str,
    data: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
}

impl<'a> GenerateContentRequest<'a> {
    fn from_model_request(request: &'a ModelRequest) -> Self {
        let parts = vec![
            RequestPart::InlineData {
                inline_data: InlineDataRef {
                    mime_type: request.image.media_type.as_str(),
                    data: &request.image.data,
                },
            },
            RequestPart::Text {
                text: request.instruction,
            },
        ];

        Self {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE", "TEXT"],
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: Option<String>,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    fn into_model_response(self) -> ModelResponse {
        let parts = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .map(|part| ModelPart {
                text: part.text,
                inline_data: part.inline_data.map(|inline| {
                    let media_type = inline
                        .mime_type
                        .as_deref()
                        .and_then(|m| m.parse().ok())
                        .unwrap_or(MediaType::Png);
                    ImagePayload::new(inline.data, media_type)
                }),
            })
            .collect();

        ModelResponse::new(parts)
    }
}
