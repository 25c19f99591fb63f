//! In-Memory Habit Store Adapter
//!
//! Keeps records and histories in memory, partitioned by owner.
//! Useful for testing and development; writes can be made to fail.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{HabitId, UserId};
use crate::domain::habit::{Habit, HabitCompletion, HabitSnapshot};
use crate::ports::{HabitStore, HabitStoreError};

#[derive(Debug, Clone)]
struct StoredHabit {
    record: HabitSnapshot,
    history: Vec<HabitCompletion>,
}

/// In-memory storage for habits
#[derive(Debug, Clone, Default)]
pub struct InMemoryHabitStore {
    owners: Arc<RwLock<HashMap<UserId, Vec<StoredHabit>>>>,
    fail_writes: Arc<AtomicBool>,
    fail_loads: Arc<AtomicBool>,
}

impl InMemoryHabitStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make create/append/update fail with `Unavailable` until reset
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make `load_all` fail with `Unavailable` until reset
    pub fn set_fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    /// Number of stored completions for a habit (for assertions)
    pub async fn stored_completion_count(&self, owner_id: &UserId, habit_id: &HabitId) -> usize {
        let owners = self.owners.read().await;
        owners
            .get(owner_id)
            .and_then(|habits| habits.iter().find(|h| h.record.id == *habit_id))
            .map(|h| h.history.len())
            .unwrap_or(0)
    }

    /// Stored record for a habit (for assertions)
    pub async fn stored_record(&self, owner_id: &UserId, habit_id: &HabitId) -> Option<HabitSnapshot> {
        let owners = self.owners.read().await;
        owners
            .get(owner_id)
            .and_then(|habits| habits.iter().find(|h| h.record.id == *habit_id))
            .map(|h| h.record.clone())
    }

    /// Clear all stored data (useful for tests)
    pub async fn clear(&self) {
        self.owners.write().await.clear();
    }

    fn check_writable(&self) -> Result<(), HabitStoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(HabitStoreError::Unavailable("writes disabled".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl HabitStore for InMemoryHabitStore {
    async fn create(&self, habit: &Habit) -> Result<HabitId, HabitStoreError> {
        self.check_writable()?;
        let mut owners = self.owners.write().await;
        let habits = owners.entry(habit.owner_id().clone()).or_default();
        if habits.iter().any(|h| h.record.id == *habit.id()) {
            return Err(HabitStoreError::AlreadyExists(*habit.id()));
        }
        habits.push(StoredHabit {
            record: habit.snapshot(),
            history: habit.completions().to_vec(),
        });
        Ok(*habit.id())
    }

    async fn append_completion(
        &self,
        owner_id: &UserId,
        habit_id: &HabitId,
        completion: &HabitCompletion,
    ) -> Result<(), HabitStoreError> {
        self.check_writable()?;
        let mut owners = self.owners.write().await;
        let stored = owners
            .get_mut(owner_id)
            .and_then(|habits| habits.iter_mut().find(|h| h.record.id == *habit_id))
            .ok_or(HabitStoreError::NotFound(*habit_id))?;
        stored.history.push(completion.clone());
        Ok(())
    }

    async fn load_all(&self, owner_id: &UserId) -> Result<Vec<Habit>, HabitStoreError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(HabitStoreError::Unavailable("loads disabled".to_string()));
        }
        let owners = self.owners.read().await;
        owners
            .get(owner_id)
            .map(|habits| {
                habits
                    .iter()
                    .map(|h| {
                        Habit::reconstitute(h.record.clone(), h.history.clone())
                            .map_err(|e| HabitStoreError::DeserializationFailed(e.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn update(&self, habit: &Habit) -> Result<(), HabitStoreError> {
        self.check_writable()?;
        let mut owners = self.owners.write().await;
        let stored = owners
            .get_mut(habit.owner_id())
            .and_then(|habits| habits.iter_mut().find(|h| h.record.id == *habit.id()))
            .ok_or(HabitStoreError::NotFound(*habit.id()))?;
        stored.record = habit.snapshot();
        Ok(())
    }
}
