//! Habit-specific error types.

use crate::domain::foundation::{DomainError, ErrorCode, HabitId, ValidationError};

use super::InvalidCadence;

/// Habit-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HabitError {
    /// Habit was not found for this owner.
    NotFound(HabitId),
    /// Habit belongs to another owner.
    Forbidden,
    /// Cadence value outside daily/weekly/biweekly/monthly.
    InvalidCadence(String),
    /// Operation not allowed in the current lifecycle or progression state.
    InvalidState(String),
    /// Habit is retired and cannot be modified.
    Retired,
    /// Completion timestamp precedes the last recorded completion.
    OutOfOrderCompletion,
    /// Validation failed.
    ValidationFailed { field: String, message: String },
    /// The habit store rejected a write.
    PersistenceFailure(String),
    /// The recovery planner could not be reached.
    RecoveryRequestFailure(String),
    /// Other infrastructure error.
    Infrastructure(String),
}

impl HabitError {
    pub fn not_found(id: HabitId) -> Self {
        HabitError::NotFound(id)
    }
    pub fn invalid_state(message: impl Into<String>) -> Self {
        HabitError::InvalidState(message.into())
    }
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        HabitError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
    pub fn persistence(message: impl Into<String>) -> Self {
        HabitError::PersistenceFailure(message.into())
    }
    pub fn infrastructure(message: impl Into<String>) -> Self {
        HabitError::Infrastructure(message.into())
    }
    pub fn code(&self) -> ErrorCode {
        match self {
            HabitError::NotFound(_) => ErrorCode::HabitNotFound,
            HabitError::Forbidden => ErrorCode::Forbidden,
            HabitError::InvalidCadence(_) => ErrorCode::InvalidCadence,
            HabitError::InvalidState(_) => ErrorCode::InvalidStateTransition,
            HabitError::Retired => ErrorCode::HabitRetired,
            HabitError::OutOfOrderCompletion => ErrorCode::OutOfOrderCompletion,
            HabitError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            HabitError::PersistenceFailure(_) => ErrorCode::PersistenceFailure,
            HabitError::RecoveryRequestFailure(_) => ErrorCode::RecoveryRequestFailure,
            HabitError::Infrastructure(_) => ErrorCode::InternalError,
        }
    }
    pub fn message(&self) -> String {
        match self {
            HabitError::NotFound(id) => format!("Habit not found: {}", id),
            HabitError::Forbidden => "Permission denied".to_string(),
            HabitError::InvalidCadence(raw) => format!("Invalid cadence: '{}'", raw),
            HabitError::InvalidState(msg) => format!("Invalid state: {}", msg),
            HabitError::Retired => "Cannot modify retired habit".to_string(),
            HabitError::OutOfOrderCompletion => {
                "Completion is earlier than the last recorded completion".to_string()
            }
            HabitError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            HabitError::PersistenceFailure(msg) => format!("Could not save habit: {}", msg),
            HabitError::RecoveryRequestFailure(msg) => {
                format!("Recovery plan request failed: {}", msg)
            }
            HabitError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true for failures the user can retry later without data loss.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            HabitError::PersistenceFailure(_)
                | HabitError::RecoveryRequestFailure(_)
                | HabitError::Infrastructure(_)
        )
    }
}

impl std::fmt::Display for HabitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for HabitError {}

impl From<InvalidCadence> for HabitError {
    fn from(err: InvalidCadence) -> Self {
        HabitError::InvalidCadence(err.0)
    }
}

impl From<ValidationError> for HabitError {
    fn from(err: ValidationError) -> Self {
        HabitError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for HabitError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::Forbidden => HabitError::Forbidden,
            ErrorCode::HabitRetired => HabitError::Retired,
            ErrorCode::InvalidStateTransition => HabitError::InvalidState(err.message),
            ErrorCode::OutOfOrderCompletion => HabitError::OutOfOrderCompletion,
            ErrorCode::InvalidCadence => HabitError::InvalidCadence(err.message),
            ErrorCode::ValidationFailed => HabitError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            ErrorCode::PersistenceFailure => HabitError::PersistenceFailure(err.message),
            ErrorCode::RecoveryRequestFailure => HabitError::RecoveryRequestFailure(err.message),
            _ => HabitError::Infrastructure(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_cadence_keeps_raw_value() {
        let err: HabitError = InvalidCadence("hourly".to_string()).into();
        assert_eq!(err, HabitError::InvalidCadence("hourly".to_string()));
        assert_eq!(err.code(), ErrorCode::InvalidCadence);
    }

    #[test]
    fn not_found_message_names_habit() {
        let id = HabitId::new();
        let err = HabitError::not_found(id);
        assert_eq!(err.code(), ErrorCode::HabitNotFound);
        assert!(err.to_string().contains(&id.to_string()));
    }

    #[test]
    fn validation_error_maps_field() {
        let err: HabitError = ValidationError::empty_field("title").into();
        assert!(matches!(err, HabitError::ValidationFailed { ref field, .. } if field == "title"));
    }

    #[test]
    fn only_io_failures_are_retryable() {
        assert!(HabitError::persistence("disk full").is_retryable());
        assert!(!HabitError::OutOfOrderCompletion.is_retryable());
        assert!(!HabitError::InvalidCadence("x".to_string()).is_retryable());
    }

    #[test]
    fn domain_error_persistence_maps_to_persistence_failure() {
        let err: HabitError =
            DomainError::new(ErrorCode::PersistenceFailure, "write timed out").into();
        assert_eq!(err, HabitError::PersistenceFailure("write timed out".to_string()));
    }
}
