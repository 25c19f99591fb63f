//! Non-fatal failures surfaced to the UI layer.
//!
//! An operation that already changed in-memory state never fails because
//! of a later I/O problem. The problem is reported as a notice on the
//! handler result instead, and the user can retry later.

use serde::Serialize;
use std::fmt;

use crate::domain::foundation::{ErrorCode, HabitId};

/// A non-blocking problem that occurred while handling a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "notice", rename_all = "snake_case")]
pub enum EngineNotice {
    /// Store write failed; in-memory state kept, writes still queued.
    PersistenceFailed {
        habit_id: HabitId,
        reason: String,
        pending_writes: usize,
    },
    /// XP could not be forwarded to the progress ledger.
    LedgerAwardFailed {
        habit_id: HabitId,
        xp: u32,
        reason: String,
    },
    /// A domain event could not be published.
    EventPublishFailed { event_type: String, reason: String },
}

impl EngineNotice {
    pub fn code(&self) -> ErrorCode {
        match self {
            EngineNotice::PersistenceFailed { .. } => ErrorCode::PersistenceFailure,
            EngineNotice::LedgerAwardFailed { .. } => ErrorCode::CollaboratorUnavailable,
            EngineNotice::EventPublishFailed { .. } => ErrorCode::InternalError,
        }
    }

    pub fn is_persistence_failure(&self) -> bool {
        matches!(self, EngineNotice::PersistenceFailed { .. })
    }
}

impl fmt::Display for EngineNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineNotice::PersistenceFailed {
                habit_id,
                reason,
                pending_writes,
            } => write!(
                f,
                "Changes to habit {} are not saved yet ({} pending): {}",
                habit_id, pending_writes, reason
            ),
            EngineNotice::LedgerAwardFailed { xp, reason, .. } => {
                write!(f, "Could not award {} XP: {}", xp, reason)
            }
            EngineNotice::EventPublishFailed { event_type, reason } => {
                write!(f, "Could not publish {}: {}", event_type, reason)
            }
        }
    }
}
