//! HTTP handler for URL processing.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use bookshelf_http::AppError;
use serde_json::json;

use super::models::{ProcessUrlRequest, ProcessUrlResponse};
use super::normalize::{NormalizeError, UrlNormalizer};

pub fn router(normalizer: Arc<UrlNormalizer>) -> Router {
    Router::new()
        .route("/process-url", post(process_url))
        .with_state(normalizer)
}

impl From<NormalizeError> for AppError {
    fn from(err: NormalizeError) -> Self {
        let field = match err {
            NormalizeError::InvalidUrl { .. } => "url",
            NormalizeError::InvalidOperation(_) => "operation",
        };
        AppError::validation(
            vec![json!({ "field": field, "error": err.to_string() })],
            err.to_string(),
        )
    }
}

async fn process_url(
    State(normalizer): State<Arc<UrlNormalizer>>,
    payload: Result<Json<ProcessUrlRequest>, JsonRejection>,
) -> Result<Json<ProcessUrlResponse>, AppError> {
    let Json(request) = payload?;
    let request = request.validate()?;

    let processed_url = normalizer.process(&request.url, request.operation)?;

    tracing::info!(
        original = %request.url,
        operation = %request.operation,
        processed = %processed_url,
        "processed url"
    );
    Ok(Json(ProcessUrlResponse { processed_url }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn post_json(body: &str) -> (StatusCode, serde_json::Value) {
        let response = router(Arc::new(UrlNormalizer::default()))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/process-url")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn processes_all() {
        let (status, body) = post_json(
            r#"{"url": "https://BYFOOD.com/Path/?query=123#Fragment", "operation": "all"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["processed_url"], "https://www.byfood.com/path#fragment");
    }

    #[tokio::test]
    async fn unknown_operation_is_rejected() {
        let (status, body) =
            post_json(r#"{"url": "https://example.com", "operation": "foo"}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["details"][0]["field"], "operation");
    }

    #[tokio::test]
    async fn unparseable_url_is_rejected() {
        let (status, body) = post_json(r#"{"url": "ht!tp://bad url", "operation": "canonical"}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["details"][0]["field"], "url");
    }

    #[tokio::test]
    async fn backslash_separated_path_is_rejected() {
        let (status, body) = post_json(
            r#"{"url": "https://example.com\\Food\\Tokyo", "operation": "redirection"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["details"][0]["field"], "url");
    }

    #[tokio::test]
    async fn empty_url_is_rejected() {
        let (status, body) = post_json(r#"{"url": "", "operation": "canonical"}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "validation_error");
    }
}
