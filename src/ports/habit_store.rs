//! HabitStore port - persistence boundary for habit records.
//!
//! Stores are partitioned by owner. The record and its completion history
//! are written separately: `update` never touches the history, which only
//! grows through `append_completion`.

use async_trait::async_trait;

use crate::domain::foundation::{HabitId, UserId};
use crate::domain::habit::{Habit, HabitCompletion, HabitError};

/// Errors that can occur during habit store operations.
#[derive(Debug, thiserror::Error)]
pub enum HabitStoreError {
    #[error("Habit not found: {0}")]
    NotFound(HabitId),

    #[error("Habit already exists: {0}")]
    AlreadyExists(HabitId),

    #[error("Failed to serialize habit: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize habit: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<HabitStoreError> for HabitError {
    fn from(err: HabitStoreError) -> Self {
        match err {
            HabitStoreError::NotFound(id) => HabitError::NotFound(id),
            other => HabitError::PersistenceFailure(other.to_string()),
        }
    }
}

/// Port for persisting and loading habits.
///
/// Assumed eventually consistent within one owner's partition.
#[async_trait]
pub trait HabitStore: Send + Sync {
    /// Persists a newly created habit, including any history it carries.
    ///
    /// # Errors
    /// Returns `AlreadyExists` if a habit with the same id is stored
    async fn create(&self, habit: &Habit) -> Result<HabitId, HabitStoreError>;

    /// Appends one completion to the habit's stored history.
    ///
    /// # Errors
    /// Returns `NotFound` if the habit is not stored for this owner
    async fn append_completion(
        &self,
        owner_id: &UserId,
        habit_id: &HabitId,
        completion: &HabitCompletion,
    ) -> Result<(), HabitStoreError>;

    /// Loads every habit of the owner with its full history, in creation order.
    async fn load_all(&self, owner_id: &UserId) -> Result<Vec<Habit>, HabitStoreError>;

    /// Overwrites the stored record (not the history).
    ///
    /// # Errors
    /// Returns `NotFound` if the habit is not stored for this owner
    async fn update(&self, habit: &Habit) -> Result<(), HabitStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time check that trait is object-safe
    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn HabitStore) {}

    #[test]
    fn not_found_maps_to_habit_not_found() {
        let id = HabitId::new();
        let err: HabitError = HabitStoreError::NotFound(id).into();
        assert_eq!(err, HabitError::NotFound(id));
    }

    #[test]
    fn io_error_maps_to_persistence_failure() {
        let err: HabitError = HabitStoreError::IoError("disk full".to_string()).into();
        assert!(matches!(err, HabitError::PersistenceFailure(ref m) if m.contains("disk full")));
    }
}
