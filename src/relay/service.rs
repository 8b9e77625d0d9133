use crate::{
    config::ApiKey,
    error::{RestyleError, Result},
    gemini::{ImageModel, ModelRequest},
    logger::Timer,
    models::{ErrorBody, ImagePayload, MediaType, RawTransformRequest, Style, TransformResponse},
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// A validated transformation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformationRequest {
    pub image: ImagePayload,
    pub style: Style,
}

impl TransformationRequest {
    /// Parses and validates a relay request body. Fails with
    /// [`RestyleError::Validation`] only.
    pub fn from_json(body: &[u8]) -> Result<Self> {
        let raw: RawTransformRequest = serde_json::from_slice(body)
            .map_err(|_| RestyleError::Validation("Invalid JSON body".into()))?;

        let present = |field: &Option<String>| field.as_deref().is_some_and(|v| !v.is_empty());

        let missing: Vec<&str> = [
            ("base64ImageData", &raw.base64_image_data),
            ("mimeType", &raw.mime_type),
            ("style", &raw.style),
        ]
        .into_iter()
        .filter(|&(_, field)| !present(field))
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(RestyleError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        let style: Style = raw.style.unwrap_or_default().parse()?;
        let media_type: MediaType = raw.mime_type.unwrap_or_default().parse()?;

        Ok(Self {
            image: ImagePayload::new(raw.base64_image_data.unwrap_or_default(), media_type),
            style,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RelayBody {
    Success(TransformResponse),
    Error(ErrorBody),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayResponse {
    pub status: u16,
    pub body: RelayBody,
}

impl RelayResponse {
    pub fn success(image: &ImagePayload) -> Self {
        Self {
            status: 200,
            body: RelayBody::Success(TransformResponse {
                transformed_base64: image.data.clone(),
                mime_type: Some(image.media_type.as_str().to_string()),
            }),
        }
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: RelayBody::Error(ErrorBody::new(message)),
        }
    }

    pub fn method_not_allowed() -> Self {
        Self::error(405, "Method Not Allowed")
    }

    pub fn from_error(error: &RestyleError) -> Self {
        Self::error(error.status_code(), error.public_message())
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// A request that passed the method and credential checks.
#[derive(Debug)]
pub struct Admitted<'a> {
    request_id: Uuid,
    api_key: &'a ApiKey,
}

impl Admitted<'_> {
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }
}

/// Backend entry point holding the model credential.
#[derive(Clone)]
pub struct RelayService {
    credential: Option<ApiKey>,
    model: Arc<dyn ImageModel>,
}

impl RelayService {
    pub fn new(credential: Option<ApiKey>, model: Arc<dyn ImageModel>) -> Self {
        if credential.is_none() {
            log::warn!("No model credential configured; every request will fail");
        }
        Self { credential, model }
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// Runs the checks that need no body: method, then credential. A
    /// rejection is final and the body must not be read.
    pub fn admit(&self, method: &str) -> std::result::Result<Admitted<'_>, RelayResponse> {
        let request_id = Uuid::new_v4();

        if method != "POST" {
            log::warn!("[req:{}] Rejected {} request", request_id, method);
            return Err(RelayResponse::method_not_allowed());
        }

        let Some(api_key) = self.credential.as_ref() else {
            log::error!("[req:{}] Model credential is not configured", request_id);
            return Err(RelayResponse::from_error(&RestyleError::Configuration(
                "model credential missing".into(),
            )));
        };

        Ok(Admitted {
            request_id,
            api_key,
        })
    }

    /// Validates the body of an admitted request and calls the model.
    pub async fn process(&self, admitted: Admitted<'_>, body: &[u8]) -> RelayResponse {
        let Admitted {
            request_id,
            api_key,
        } = admitted;

        let request = match TransformationRequest::from_json(body) {
            Ok(request) => request,
            Err(e) => {
                log::info!("[req:{}] Invalid request: {}", request_id, e);
                return RelayResponse::from_error(&e);
            }
        };

        log::info!(
            "[req:{}] Transforming {} image with style '{}'",
            request_id,
            request.image.media_type,
            request.style
        );

        match self.transform(api_key, request).await {
            Ok(image) => {
                log::info!(
                    "[req:{}] Returning {} image ({} base64 chars)",
                    request_id,
                    image.media_type,
                    image.data.len()
                );
                RelayResponse::success(&image)
            }
            Err(e) => {
                log::error!("[req:{}] Transformation failed: {}", request_id, e);
                RelayResponse::from_error(&e)
            }
        }
    }

    /// Rejects an admitted request whose body could not be read in full.
    pub fn reject_body(&self, admitted: Admitted<'_>, error: RestyleError) -> RelayResponse {
        log::info!("[req:{}] Unreadable body: {}", admitted.request_id, error);
        RelayResponse::from_error(&error)
    }

    pub async fn handle(&self, method: &str, body: &[u8]) -> RelayResponse {
        match self.admit(method) {
            Ok(admitted) => self.process(admitted, body).await,
            Err(rejection) => rejection,
        }
    }

    async fn transform(
        &self,
        api_key: &ApiKey,
        request: TransformationRequest,
    ) -> Result<ImagePayload> {
        let model_request = ModelRequest {
            image: request.image,
            instruction: request.style.template(),
        };

        let response = {
            let _timer = Timer::new("model call");
            self.model.generate(api_key, model_request).await?
        };

        match response.first_inline_image() {
            Some(image) => Ok(image.clone()),
            None => {
                let text = response.text();
                if !text.is_empty() {
                    log::warn!("Model answered without an image: {}", text);
                }
                Err(RestyleError::ModelNoOutput)
            }
        }
    }
}
