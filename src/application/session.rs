//! HabitSession - the in-memory working set of one owner's habits.
//!
//! The session is the source of truth while it lives. Every mutation is
//! applied in memory first and queued as a pending write; `flush_pending`
//! then pushes the queue to the store in submission order. A failed flush
//! leaves both the in-memory state and the remaining queue untouched so the
//! caller can retry.

use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::domain::foundation::{HabitId, Timestamp, UserId};
use crate::domain::habit::{AppliedCompletion, Habit, HabitCompletion, HabitError};
use crate::ports::HabitStore;

/// A store write that has been applied in memory but not yet confirmed.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingWrite {
    AppendCompletion {
        habit_id: HabitId,
        completion: HabitCompletion,
    },
    UpdateRecord(Habit),
}

impl PendingWrite {
    pub fn habit_id(&self) -> &HabitId {
        match self {
            PendingWrite::AppendCompletion { habit_id, .. } => habit_id,
            PendingWrite::UpdateRecord(habit) => habit.id(),
        }
    }
}

/// Single-owner habit session.
pub struct HabitSession {
    owner_id: UserId,
    store: Arc<dyn HabitStore>,
    habits: RwLock<Vec<Habit>>,
    pending: Mutex<VecDeque<PendingWrite>>,
}

impl HabitSession {
    /// Loads every habit of `owner_id` from the store.
    ///
    /// # Errors
    ///
    /// - `PersistenceFailure` if the store cannot be read
    pub async fn load(owner_id: UserId, store: Arc<dyn HabitStore>) -> Result<Self, HabitError> {
        let habits = store.load_all(&owner_id).await?;
        debug!(owner_id = %owner_id, habits = habits.len(), "Habit session loaded");

        Ok(Self {
            owner_id,
            store,
            habits: RwLock::new(habits),
            pending: Mutex::new(VecDeque::new()),
        })
    }

    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    /// # Errors
    ///
    /// - `Forbidden` if `actor` does not own this session
    pub fn authorize(&self, actor: &UserId) -> Result<(), HabitError> {
        if &self.owner_id == actor {
            Ok(())
        } else {
            Err(HabitError::Forbidden)
        }
    }

    /// Consistent snapshot of all habits in creation order.
    pub async fn habits(&self) -> Vec<Habit> {
        self.habits.read().await.clone()
    }

    /// # Errors
    ///
    /// - `NotFound` if the habit is not part of this session
    pub async fn get(&self, habit_id: &HabitId) -> Result<Habit, HabitError> {
        self.habits
            .read()
            .await
            .iter()
            .find(|h| h.id() == habit_id)
            .cloned()
            .ok_or(HabitError::NotFound(*habit_id))
    }

    /// Persists a new habit, then adds it to the session.
    ///
    /// Creation is not optimistic: nothing exists until the store confirms.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if the habit belongs to another owner
    /// - `PersistenceFailure` if the store rejects the habit
    pub async fn create(&self, habit: Habit) -> Result<Habit, HabitError> {
        self.authorize(habit.owner_id())?;
        self.store.create(&habit).await?;
        self.habits.write().await.push(habit.clone());
        Ok(habit)
    }

    /// Applies a completion in memory and queues its writes.
    ///
    /// # Errors
    ///
    /// - `Forbidden`, `NotFound`, or any reducer error; nothing is changed
    pub async fn apply_completion(
        &self,
        actor: &UserId,
        habit_id: &HabitId,
        completion: HabitCompletion,
        now: &Timestamp,
    ) -> Result<AppliedCompletion, HabitError> {
        self.authorize(actor)?;
        let mut habits = self.habits.write().await;
        let slot = habits
            .iter_mut()
            .find(|h| h.id() == habit_id)
            .ok_or(HabitError::NotFound(*habit_id))?;

        let applied = slot.apply_completion(completion.clone(), now)?;
        *slot = applied.habit.clone();

        // Queue while still holding the habits lock so write order matches
        // application order.
        let mut pending = self.pending.lock().await;
        pending.push_back(PendingWrite::AppendCompletion {
            habit_id: *habit_id,
            completion,
        });
        pending.push_back(PendingWrite::UpdateRecord(applied.habit.clone()));

        Ok(applied)
    }

    /// Replaces a habit with the result of `change` and queues a record update.
    ///
    /// # Errors
    ///
    /// - `Forbidden`, `NotFound`, or the error returned by `change`
    pub async fn update_with<F>(&self, actor: &UserId, habit_id: &HabitId, change: F) -> Result<Habit, HabitError>
    where
        F: FnOnce(&Habit) -> Result<Habit, HabitError>,
    {
        self.authorize(actor)?;
        let mut habits = self.habits.write().await;
        let slot = habits
            .iter_mut()
            .find(|h| h.id() == habit_id)
            .ok_or(HabitError::NotFound(*habit_id))?;

        let next = change(slot)?;
        *slot = next.clone();
        self.pending
            .lock()
            .await
            .push_back(PendingWrite::UpdateRecord(next.clone()));
        Ok(next)
    }

    /// Number of writes not yet confirmed by the store.
    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }

    /// Writes queued changes to the store in submission order.
    ///
    /// Stops at the first failure; the failed write and everything behind
    /// it stay queued. Returns the number of writes confirmed.
    ///
    /// # Errors
    ///
    /// - `PersistenceFailure` (or `NotFound`) from the store
    pub async fn flush_pending(&self) -> Result<usize, HabitError> {
        let mut pending = self.pending.lock().await;
        let mut written = 0;

        while let Some(write) = pending.front() {
            let result = match write {
                PendingWrite::AppendCompletion {
                    habit_id,
                    completion,
                } => {
                    self.store
                        .append_completion(&self.owner_id, habit_id, completion)
                        .await
                }
                PendingWrite::UpdateRecord(habit) => self.store.update(habit).await,
            };

            if let Err(e) = result {
                warn!(
                    owner_id = %self.owner_id,
                    habit_id = %write.habit_id(),
                    pending = pending.len(),
                    error = %e,
                    "Habit store write failed, keeping in-memory state"
                );
                return Err(e.into());
            }
            pending.pop_front();
            written += 1;
        }

        Ok(written)
    }
}
