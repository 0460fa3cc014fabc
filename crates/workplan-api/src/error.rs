//! Error types for the timeline API.
//!
//! [`ApiError`] unifies all failure modes into a single enum that can be
//! converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use workplan_core::TimelineError;

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested timeline was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The prison number in the path is not in `A1234BC` form.
    #[error("invalid prison number: {0}")]
    InvalidPrisonNumber(String),

    /// An invalid query parameter was provided.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The request body could not be read.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// The request body failed field validation.
    #[error("validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// An upstream collaborator failed.
    #[error("upstream error: {0}")]
    Upstream(String),
}

impl From<TimelineError> for ApiError {
    fn from(err: TimelineError) -> Self {
        match err {
            TimelineError::NotFound { prison_number } => {
                Self::NotFound(format!("timeline for prisoner {prison_number}"))
            }
            e @ (TimelineError::EventStore(_) | TimelineError::MovementHistory(_)) => {
                Self::Upstream(e.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidPrisonNumber(_)
            | Self::InvalidQuery(_)
            | Self::InvalidBody(_)
            | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        };

        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
