//! Errors shared by the one-way collaborator ports.

use crate::domain::habit::HabitError;

/// Failure of an outbound collaborator request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Collaborator answered with a non-success status.
    #[error("request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// Payload could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Collaborator is not reachable or not configured.
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),
}

impl CollaboratorError {
    pub fn network(message: impl Into<String>) -> Self {
        CollaboratorError::Network(message.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        CollaboratorError::Unavailable(message.into())
    }
}

impl From<CollaboratorError> for HabitError {
    fn from(err: CollaboratorError) -> Self {
        HabitError::RecoveryRequestFailure(err.to_string())
    }
}
