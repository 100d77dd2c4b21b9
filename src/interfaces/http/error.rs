use crate::error::TipError;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

#[derive(Debug, Serialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

/// HTTP-facing wrapper around `TipError`.
#[derive(Debug)]
pub struct ApiError(pub TipError);

impl ApiError {
    /// Status code and client-safe message for an error.
    ///
    /// Internal details of 5xx errors stay in the logs.
    pub fn status_and_body(&self) -> (StatusCode, ErrorBody) {
        let (status, message) = match &self.0 {
            TipError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            TipError::CreatorNotFound(_) => {
                (StatusCode::NOT_FOUND, "Creator not found".to_string())
            }
            TipError::PaymentNotFound(_) => {
                (StatusCode::NOT_FOUND, "Payment not found".to_string())
            }
            TipError::InvalidTransition { .. } => (StatusCode::CONFLICT, self.0.to_string()),
            TipError::PaymentProvider(_) => {
                (StatusCode::BAD_GATEWAY, "Payment provider error".to_string())
            }
            TipError::Persistence(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to process tip".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };
        (status, ErrorBody { error: message })
    }
}

impl From<TipError> for ApiError {
    fn from(err: TipError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(TipError::Validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self.0, "request failed");
        }
        (status, Json(body)).into_response()
    }
}
