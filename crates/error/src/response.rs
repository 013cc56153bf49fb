//! # Error Response Mapping
//!
//! Converts [`AppError`] values into JSON HTTP responses.
//!
//! ## Response format
//!
//! ```json
//! {
//!   "success": false,
//!   "code": "FORBIDDEN",
//!   "message": "You must be a reporter on this project"
//! }
//! ```

use axum::{response::IntoResponse, response::Response, Json};
use serde::Serialize;

use crate::AppError;

/// JSON body for error responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    /// Always false for errors.
    pub success: bool,
    /// Stable machine-readable error code.
    pub code: String,
    /// Human-readable message. Opaque for server-side failures.
    pub message: String,
}

impl ErrorBody {
    /// Build the wire body for an error.
    #[must_use]
    pub fn from_error(err: &AppError) -> Self {
        let message = if err.is_client_facing() {
            err.message().to_string()
        } else {
            "Internal server error".to_string()
        };
        Self {
            success: false,
            code: err.code().to_string(),
            message,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(code = %self.code(), message = %self.message(), "Request failed");
        } else {
            tracing::debug!(code = %self.code(), message = %self.message(), "Request rejected");
        }

        let body = ErrorBody::from_error(&self);

        if status == http::StatusCode::UNAUTHORIZED {
            (status, [(http::header::WWW_AUTHENTICATE, "Bearer")], Json(body)).into_response()
        } else {
            (status, Json(body)).into_response()
        }
    }
}
