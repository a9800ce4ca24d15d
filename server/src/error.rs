//! Error bridging between the domain taxonomy and HTTP responses.
//!
//! Handlers return `Result<_, ApiError>`; the conversion from
//! [`eventhub_core::Error`] picks the status code and a machine-readable
//! code, and `IntoResponse` renders a JSON body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use eventhub_core::Error;
use serde::Serialize;
use tracing::{error, warn};

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    code: &'static str,
}

/// JSON body of an error response.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

impl ApiError {
    /// Create a 422 Unprocessable Entity error for malformed requests the
    /// domain layer never sees.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: message.into(),
            code: "VALIDATION_ERROR",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let (status, code) = match &error {
            Error::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Error::CapacityExceeded { .. } => (StatusCode::CONFLICT, "CAPACITY_EXCEEDED"),
            Error::InvalidState(_) => (StatusCode::CONFLICT, "INVALID_STATE"),
            Error::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Error::Transport(_) => (StatusCode::BAD_GATEWAY, "TRANSPORT_ERROR"),
        };
        if matches!(error, Error::Transport(_)) {
            error!(%error, "persistence backend failure");
        } else {
            warn!(%error, "request rejected");
        }
        Self {
            status,
            message: error.to_string(),
            code,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: ErrorDetail {
                    code: self.code,
                    message: self.message,
                },
            }),
        )
            .into_response()
    }
}
