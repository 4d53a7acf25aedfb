use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorBody;
use service::ServiceError;
use thiserror::Error;
use tracing::error;

/// Service failure rendered as `{"error": <message>}`.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub ServiceError);

impl ApiError {
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match &self.0 {
            ServiceError::NotFound { .. } => (StatusCode::NOT_FOUND, "Not found".into()),
            // malformed bodies share the generic 400 message; only a missing field is named
            ServiceError::NotAJson => (StatusCode::BAD_REQUEST, "Bad Request".into()),
            ServiceError::MissingField(field) => (StatusCode::BAD_REQUEST, format!("Missing {field}")),
            ServiceError::Storage(_) | ServiceError::Hash(_) | ServiceError::Model(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".into())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = self.status_and_message();
        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        }
        (status, Json(ErrorBody::new(msg))).into_response()
    }
}

pub async fn not_found() -> (StatusCode, Json<ErrorBody>) {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new("Not found")))
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
