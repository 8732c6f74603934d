//! Request extractors that reject with classified transport errors
//!
//! Axum's own rejections render as plain text. These wrappers render them as
//! flat error bodies instead, so a malformed request never reaches a service
//! and still gets the common error shape.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::classify::ApiError;

/// JSON body extractor
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor
#[derive(Debug, Clone, Copy, Default, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Path parameter extractor
#[derive(Debug, Clone, Copy, Default, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

impl<T: Serialize> IntoResponse for ApiJson<T> {
    fn into_response(self) -> Response {
        Json(self.0).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match &rejection {
            JsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                StatusCode::BAD_REQUEST
            }
            other => other.status(),
        };
        ApiError::transport(status, rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::transport(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        let status = match rejection.status() {
            status if status.is_client_error() => StatusCode::BAD_REQUEST,
            status => status,
        };
        ApiError::transport(status, rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, extract::Request, routing::post, Router};
    use serde::Deserialize;
    use tower::ServiceExt;

    use crate::classify::ErrorClass;

    #[derive(Debug, Deserialize, Serialize)]
    struct Payload {
        name: String,
    }

    #[derive(Debug, Deserialize)]
    struct Paging {
        limit: Option<u32>,
    }

    async fn echo(ApiQuery(paging): ApiQuery<Paging>, ApiJson(payload): ApiJson<Payload>) -> String {
        format!("{}:{:?}", payload.name, paging.limit)
    }

    fn app() -> Router {
        Router::new().route("/echo", post(echo))
    }

    async fn send(request: Request) -> (StatusCode, Option<ErrorClass>, serde_json::Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let class = response
            .extensions()
            .get::<crate::classify::Failure>()
            .map(|failure| failure.0);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, class, body)
    }

    fn request(uri: &str, content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = Request::builder().method("POST").uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn test_valid_request_passes() {
        let response = app()
            .oneshot(request("/echo?limit=3", Some("application/json"), r#"{"name":"cash"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_content_type_is_415() {
        let (status, class, body) = send(request("/echo", None, r#"{"name":"cash"}"#)).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(class, Some(ErrorClass::Transport));
        assert_eq!(body["status"], "error");
        assert_eq!(body["code"], 415);
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        let (status, _, body) = send(request("/echo", Some("application/json"), "{name")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
    }

    #[tokio::test]
    async fn test_mistyped_json_is_400() {
        let (status, _, _) = send(request("/echo", Some("application/json"), r#"{"name":7}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_query_is_400() {
        let (status, class, body) = send(request(
            "/echo?limit=many",
            Some("application/json"),
            r#"{"name":"cash"}"#,
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(class, Some(ErrorClass::Transport));
        assert_eq!(body["code"], 400);
    }
}
