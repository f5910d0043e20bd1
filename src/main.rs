use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use vision_ocr::models::{OcrRequest, OcrResponse};
use vision_ocr::{Config, ExtractionError, Extractor, ImageSource, OcrOptions};

type AppState = Arc<Extractor>;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Config::from_env().unwrap();
    if config.api_key.is_none() {
        tracing::warn!("GROQ_API_KEY is not set; requests must supply api_key");
    }
    let bind_addr = config.bind_addr.clone();
    let extractor = Extractor::from_config(config).unwrap();

    let app = router(Arc::new(extractor));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await.unwrap();
    tracing::info!("listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.unwrap();
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ocr", post(ocr_endpoint))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

async fn ocr_endpoint(State(extractor): State<AppState>, Json(req): Json<OcrRequest>) -> Response {
    if !extractor.config().allow_local_files
        && !req.file_path.trim().is_empty()
        && !ImageSource::classify(&req.file_path).is_remote()
    {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Local file paths are disabled; pass an http(s) URL"})),
        )
            .into_response();
    }

    let options = OcrOptions {
        api_key: req.api_key,
        model: req.model,
    };

    match extractor.extract(&req.file_path, &options).await {
        Ok(markdown) => (StatusCode::OK, Json(OcrResponse { markdown })).into_response(),
        Err(e) => (error_status(&e), Json(json!({"detail": e.to_string()}))).into_response(),
    }
}

fn error_status(err: &ExtractionError) -> StatusCode {
    match err {
        ExtractionError::InvalidInput => StatusCode::BAD_REQUEST,
        ExtractionError::MissingCredential => StatusCode::UNAUTHORIZED,
        ExtractionError::FileRead(_) | ExtractionError::EmptyResult => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ExtractionError::Processing(_) => StatusCode::BAD_GATEWAY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn maps_errors_to_status() {
        assert_eq!(error_status(&ExtractionError::InvalidInput), StatusCode::BAD_REQUEST);
        assert_eq!(
            error_status(&ExtractionError::MissingCredential),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            error_status(&ExtractionError::FileRead(io::Error::from(io::ErrorKind::NotFound))),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            error_status(&ExtractionError::EmptyResult),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            error_status(&ExtractionError::Processing("timeout".into())),
            StatusCode::BAD_GATEWAY
        );
    }

    #[tokio::test]
    async fn rejects_local_paths_when_disabled() {
        let extractor = Extractor::from_config(Config::default()).unwrap();
        let req = OcrRequest {
            file_path: "/etc/passwd".into(),
            api_key: None,
            model: None,
        };
        let resp = ocr_endpoint(State(Arc::new(extractor)), Json(req)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn empty_path_is_bad_request() {
        let extractor = Extractor::from_config(Config::default()).unwrap();
        let req = OcrRequest {
            file_path: String::new(),
            api_key: None,
            model: None,
        };
        let resp = ocr_endpoint(State(Arc::new(extractor)), Json(req)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn absent_file_path_is_bad_request() {
        let extractor = Extractor::from_config(Config::default()).unwrap();
        let req: OcrRequest = serde_json::from_str("{}").unwrap();
        let resp = ocr_endpoint(State(Arc::new(extractor)), Json(req)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_api_key_is_unauthorized() {
        let extractor = Extractor::from_config(Config::default()).unwrap();
        let req = OcrRequest {
            file_path: "https://example.com/receipt.png".into(),
            api_key: Some("  ".into()),
            model: None,
        };
        let resp = ocr_endpoint(State(Arc::new(extractor)), Json(req)).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
