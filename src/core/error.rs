use serde::Serialize;
use thiserror::Error;

use crate::services::GatewayError;

/// Coarse classification of an interaction failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Transport,
    Conflict,
    Validation,
    InvalidTransition,
    NotFound,
    Unauthorized,
}

/// Typed failure returned by every controller operation
///
/// Carries only owned strings so it can be kept as a list's last error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InteractionError {
    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Rejected: {0}")]
    Conflict(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: session missing or expired")]
    Unauthorized,
}

impl InteractionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            InteractionError::Transport(_) => ErrorKind::Transport,
            InteractionError::Conflict(_) => ErrorKind::Conflict,
            InteractionError::Validation(_) => ErrorKind::Validation,
            InteractionError::InvalidTransition(_) => ErrorKind::InvalidTransition,
            InteractionError::NotFound(_) => ErrorKind::NotFound,
            InteractionError::Unauthorized => ErrorKind::Unauthorized,
        }
    }

    /// Only transport failures are worth offering a retry for
    pub fn is_retryable(&self) -> bool {
        matches!(self, InteractionError::Transport(_))
    }
}

impl From<GatewayError> for InteractionError {
    fn from(value: GatewayError) -> Self {
        match value {
            GatewayError::RequestError(e) => InteractionError::Transport(e.to_string()),
            GatewayError::ApiError { status, message } => {
                InteractionError::Transport(format!("{}: {}", status, message))
            }
            GatewayError::InvalidResponse(message) => InteractionError::Transport(message),
            GatewayError::Conflict(reason) => InteractionError::Conflict(reason),
            GatewayError::NotFound(reason) => InteractionError::NotFound(reason),
            GatewayError::Unauthorized => InteractionError::Unauthorized,
        }
    }
}

impl From<validator::ValidationErrors> for InteractionError {
    fn from(value: validator::ValidationErrors) -> Self {
        InteractionError::Validation(value.to_string())
    }
}
