use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::response;
use crate::service::{ErrorKind, ServiceError};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Content-Type must be application/json")]
    UnsupportedMediaType,

    #[error("invalid JSON")]
    InvalidJson(#[source] serde_json::Error),

    #[error("invalid id")]
    InvalidId(String),

    #[error("request body too large")]
    BodyTooLarge(#[source] axum::Error),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// nginx's "client closed request". Only reachable once the client is gone,
/// so the status shows up in server logs and nowhere else.
fn client_closed_request() -> StatusCode {
    StatusCode::from_u16(499).unwrap_or(StatusCode::REQUEST_TIMEOUT)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::UnsupportedMediaType => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, self.to_string())
            }
            AppError::InvalidJson(e) => {
                tracing::debug!("Rejected request body: {}", e);
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::InvalidId(raw) => {
                tracing::debug!(id = %raw, "Rejected path id");
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::BodyTooLarge(e) => {
                tracing::debug!("Failed to buffer request body: {}", e);
                (StatusCode::PAYLOAD_TOO_LARGE, self.to_string())
            }
            AppError::Service(e) => match e.kind() {
                ErrorKind::Validation => {
                    tracing::debug!(error = %e, "validation failed");
                    (StatusCode::BAD_REQUEST, e.to_string())
                }
                ErrorKind::NotFound => {
                    tracing::debug!(error = %e, "user not found");
                    (StatusCode::NOT_FOUND, "user not found".to_string())
                }
                ErrorKind::Timeout => {
                    tracing::warn!(error = %e, "request deadline exceeded");
                    (StatusCode::GATEWAY_TIMEOUT, "request timeout".to_string())
                }
                ErrorKind::Canceled => {
                    tracing::warn!(error = %e, "request canceled before completion");
                    return client_closed_request().into_response();
                }
                ErrorKind::ShuttingDown => {
                    tracing::warn!(error = %e, "request aborted by shutdown");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "server shutting down".to_string(),
                    )
                }
                ErrorKind::Persistence => {
                    tracing::error!("Database error: {:?}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal server error".to_string(),
                    )
                }
            },
        };

        response::error(status, &message)
    }
}
