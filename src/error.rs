use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;

use crate::{providers::ProviderError, state::session::SessionStateError};

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Operation cannot be performed in the current state.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// A content provider call failed.
    #[error("upstream provider failed")]
    Upstream(#[source] ProviderError),
    /// No provider data could be resolved for the requested item.
    #[error("no content data resolved")]
    ContentUnresolved,
    /// The AI generator produced no usable quiz payload.
    #[error("quiz generation failed")]
    GenerationFailed,
}

impl From<ProviderError> for ServiceError {
    fn from(err: ProviderError) -> Self {
        ServiceError::Upstream(err)
    }
}

impl From<SessionStateError> for ServiceError {
    fn from(err: SessionStateError) -> Self {
        match err {
            SessionStateError::EmptyLevel(level) => {
                ServiceError::InvalidInput(format!("level {level} has no questions"))
            }
            SessionStateError::NotAwaitingAnswer => {
                ServiceError::InvalidState("no question is awaiting an answer".into())
            }
            SessionStateError::Finished => {
                ServiceError::InvalidState("the quiz round is already finished".into())
            }
            SessionStateError::NoContent => {
                ServiceError::InvalidState("the session has no content attached".into())
            }
            SessionStateError::LegendSolved => {
                ServiceError::InvalidState("the title was already guessed".into())
            }
        }
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Conflict with current state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::InvalidState(message) => AppError::Conflict(message),
            ServiceError::NotFound(message) => AppError::NotFound(message),
            // Upstream details are logged server-side; clients only see a
            // short generic message.
            ServiceError::Upstream(_) | ServiceError::ContentUnresolved => {
                AppError::Internal("failed to fetch content".into())
            }
            ServiceError::GenerationFailed => AppError::Internal("AI returned no quiz".into()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}
