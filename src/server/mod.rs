//! HTTP server module
//!
//! Exposes `GET /inference/:token` and a health probe.

mod api;
mod types;

pub use api::create_router;
pub use types::*;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::InferenceError;

impl InferenceError {
    pub fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

// Plain-text body; details stay in the server log
impl IntoResponse for InferenceError {
    fn into_response(self) -> Response {
        (self.status_code(), self.public_message()).into_response()
    }
}
