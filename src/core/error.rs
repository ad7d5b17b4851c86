use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

pub const TOKEN_ISSUANCE_FAILED: &str = "Failed to get FCM token";
pub const DELIVERY_FAILED: &str = "Failed to send FCM message";

/// Failure reported by the messaging provider, carried through to callers verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct ProviderError {
    pub code: String,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn invalid_credential(message: impl Into<String>) -> Self {
        Self::new("app/invalid-credential", message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new("app/network-error", message)
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("token issuance failed: {0}")]
    TokenIssuance(#[source] ProviderError),
    #[error("message delivery failed: {0}")]
    Delivery(#[source] ProviderError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn configuration(message: String) -> Self {
        Self::Configuration(message)
    }

    pub fn bad_request(message: String) -> Self {
        Self::BadRequest(message)
    }

    pub fn not_found(message: String) -> Self {
        Self::NotFound(message)
    }

    pub fn internal(message: String) -> Self {
        Self::Internal(message)
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl ErrorResponse {
    fn plain(error: String) -> Self {
        Self {
            error,
            details: None,
            code: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, ErrorResponse::plain(message)),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, ErrorResponse::plain(message)),
            Self::TokenIssuance(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::plain(TOKEN_ISSUANCE_FAILED.to_string()),
            ),
            Self::Delivery(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    error: DELIVERY_FAILED.to_string(),
                    details: Some(err.message),
                    code: Some(err.code),
                },
            ),
            other @ (Self::Configuration(_) | Self::Internal(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::plain(other.to_string()),
            ),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};

    async fn render(error: AppError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn bad_request_keeps_message_verbatim() {
        let (status, body) = render(AppError::bad_request("FCM token is required".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "FCM token is required" }));
    }

    #[tokio::test]
    async fn delivery_failure_passes_provider_code_and_message() {
        let provider = ProviderError::new(
            "messaging/registration-token-not-registered",
            "Requested entity was not found.",
        );
        let (status, body) = render(AppError::Delivery(provider)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({
                "error": "Failed to send FCM message",
                "details": "Requested entity was not found.",
                "code": "messaging/registration-token-not-registered"
            })
        );
    }

    #[tokio::test]
    async fn token_failure_hides_provider_detail() {
        let provider = ProviderError::invalid_credential("invalid_grant (Invalid JWT Signature.)");
        let (status, body) = render(AppError::TokenIssuance(provider)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to get FCM token" }));
    }
}
