use crate::{
    config::Config,
    error::{RestyleError, Result},
    relay::{RelayResponse, RelayService},
};
use actix_web::{
    http::{header, StatusCode},
    middleware, web, App, HttpRequest, HttpResponse, HttpServer,
};
use futures::StreamExt;

pub const TRANSFORM_PATH: &str = "/api/transform";
pub const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

/// Mounts the transform route. Every method is routed to the service so that
/// it can answer non-POST requests itself.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource(TRANSFORM_PATH).route(web::route().to(transform)));
}

/// The body is only read once the method and credential checks have passed.
async fn transform(
    req: HttpRequest,
    payload: web::Payload,
    relay: web::Data<RelayService>,
) -> HttpResponse {
    let admitted = match relay.admit(req.method().as_str()) {
        Ok(admitted) => admitted,
        Err(rejection) => return into_http_response(rejection),
    };

    let response = match read_body(payload).await {
        Ok(body) => relay.process(admitted, &body).await,
        Err(e) => relay.reject_body(admitted, e),
    };
    into_http_response(response)
}

async fn read_body(mut payload: web::Payload) -> Result<web::BytesMut> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| {
            RestyleError::Validation(format!("Failed to read request body: {}", e))
        })?;
        if body.len() + chunk.len() > MAX_BODY_BYTES {
            return Err(RestyleError::Validation(format!(
                "Request body exceeds {} MiB",
                MAX_BODY_BYTES / (1024 * 1024)
            )));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

fn into_http_response(response: RelayResponse) -> HttpResponse {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = HttpResponse::build(status);
    if status == StatusCode::METHOD_NOT_ALLOWED {
        builder.insert_header((header::ALLOW, "POST"));
    }
    builder.json(response.body)
}

pub async fn run(config: &Config, service: RelayService) -> Result<()> {
    let data = web::Data::new(service);
    let host = config.host().to_string();
    let port = config.port();

    crate::logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), &host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(middleware::Logger::new("%r %s %Dms"))
            .configure(configure)
    })
    .bind((host.as_str(), port))
    .map_err(|e| RestyleError::Server(format!("failed to bind {}:{}: {}", host, port, e)))?
    .run()
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::ApiKey,
        gemini::{ImageModel, ModelPart, ModelRequest, ModelResponse},
        models::{ImagePayload, MediaType},
    };
    use actix_web::{http::Method, test};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Arc;

    struct EchoModel;

    #[async_trait]
    impl ImageModel for EchoModel {
        async fn generate(&self, _api_key: &ApiKey, request: ModelRequest) -> Result<ModelResponse> {
            Ok(ModelResponse::new(vec![ModelPart::image(ImagePayload::new(
                request.image.data,
                MediaType::Png,
            ))]))
        }
    }

    fn relay(key: Option<&str>) -> web::Data<RelayService> {
        web::Data::new(RelayService::new(
            key.and_then(ApiKey::new),
            Arc::new(EchoModel),
        ))
    }

    #[actix_web::test]
    async fn test_post_transforms() {
        let app = test::init_service(
            App::new().app_data(relay(Some("key"))).configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(TRANSFORM_PATH)
            .set_json(json!({
                "base64ImageData": "aW1hZ2U=",
                "mimeType": "image/png",
                "style": "lofi"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["transformedBase64"], "aW1hZ2U=");
        assert_eq!(body["mimeType"], "image/png");
    }

    #[actix_web::test]
    async fn test_get_is_method_not_allowed() {
        let app = test::init_service(
            App::new().app_data(relay(Some("key"))).configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri(TRANSFORM_PATH).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers().get(header::ALLOW).unwrap(), "POST");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"error": "Method Not Allowed"}));
    }

    #[actix_web::test]
    async fn test_bad_style_is_client_error() {
        let app = test::init_service(
            App::new().app_data(relay(Some("key"))).configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(TRANSFORM_PATH)
            .set_json(json!({
                "base64ImageData": "aW1hZ2U=",
                "mimeType": "image/png",
                "style": "bogus"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("bogus"));
    }

    fn oversized_body() -> Vec<u8> {
        vec![b'a'; MAX_BODY_BYTES + 1]
    }

    #[actix_web::test]
    async fn test_lowercase_post_is_method_not_allowed() {
        let app = test::init_service(
            App::new().app_data(relay(Some("key"))).configure(configure),
        )
        .await;

        let req = test::TestRequest::default()
            .method(Method::from_bytes(b"post").unwrap())
            .uri(TRANSFORM_PATH)
            .set_json(json!({
                "base64ImageData": "aW1hZ2U=",
                "mimeType": "image/png",
                "style": "lofi"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[actix_web::test]
    async fn test_get_with_oversized_body_is_method_not_allowed() {
        let app = test::init_service(
            App::new().app_data(relay(Some("key"))).configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(TRANSFORM_PATH)
            .set_payload(oversized_body())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"error": "Method Not Allowed"}));
    }

    #[actix_web::test]
    async fn test_missing_credential_ignores_oversized_body() {
        let app =
            test::init_service(App::new().app_data(relay(None)).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri(TRANSFORM_PATH)
            .set_payload(oversized_body())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], crate::error::CONFIGURATION_MESSAGE);
    }

    #[actix_web::test]
    async fn test_oversized_body_is_json_client_error() {
        let app = test::init_service(
            App::new().app_data(relay(Some("key"))).configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(TRANSFORM_PATH)
            .set_payload(oversized_body())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("exceeds"));
    }

    #[actix_web::test]
    async fn test_missing_credential_is_server_error() {
        let app =
            test::init_service(App::new().app_data(relay(None)).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri(TRANSFORM_PATH)
            .set_payload("anything")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], crate::error::CONFIGURATION_MESSAGE);
    }
}
