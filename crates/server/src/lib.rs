//! Call Evaluation Server
//!
//! HTTP endpoints that turn an audio file or a diarized transcript into a
//! scored evaluation report.

pub mod http;
pub mod metrics;
pub mod state;

pub use http::{create_router, is_allowed_extension, ALLOWED_EXTENSIONS};
pub use metrics::init_metrics;
pub use state::AppState;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use call_eval_core::ErrorKind;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Evaluation(#[from] call_eval_core::Error),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Evaluation(e) => match e.kind() {
                ErrorKind::BadInput => StatusCode::BAD_REQUEST,
                ErrorKind::Upstream => StatusCode::BAD_GATEWAY,
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Short error class for the response body and the error counter
    pub fn kind(&self) -> &'static str {
        match self {
            ServerError::InvalidRequest(_) => ErrorKind::BadInput.as_str(),
            ServerError::Unavailable(_) => "unavailable",
            ServerError::Evaluation(e) => e.kind().as_str(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }
        crate::metrics::record_error(self.kind());

        let body = serde_json::json!({
            "error": self.kind(),
            "detail": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}
