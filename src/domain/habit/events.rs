//! Habit domain events.
//!
//! Events published when habit state changes or a collaborator call fails:
//! - `HabitCreated` - New habit created
//! - `HabitUpdated` - Definition edited
//! - `HabitStatusChanged` - Paused, resumed or retired
//! - `HabitCompleted` - Completion applied, XP awarded
//! - `ProgressionTriggered` - Habit became eligible for the next tier
//! - `HabitPromoted` - Next-tier proposal accepted
//! - `SetbackDetected` - Lapse found by a detection pass
//! - `RecoveryPlanReceived` - Plan stored for the owner
//! - `CollaboratorRequestFailed` - Notification for a failed one-way request

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{
    domain_event, EventId, HabitId, RecoveryPlanId, SetbackId, Timestamp, UserId,
};

use super::{Cadence, DifficultyTier, HabitStatus, SetbackKind, SetbackSeverity};

// ════════════════════════════════════════════════════════════════════════════
// HabitCreated
// ════════════════════════════════════════════════════════════════════════════

/// Published when a new habit is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitCreated {
    pub event_id: EventId,
    pub habit_id: HabitId,
    pub owner_id: UserId,
    pub title: String,
    pub cadence: Cadence,
    pub difficulty: DifficultyTier,
    pub created_at: Timestamp,
}

domain_event!(
    HabitCreated,
    event_type = "habit.created.v1",
    schema_version = 1,
    aggregate_id = habit_id,
    aggregate_type = "Habit",
    occurred_at = created_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// HabitUpdated
// ════════════════════════════════════════════════════════════════════════════

/// Published when a habit's definition is edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitUpdated {
    pub event_id: EventId,
    pub habit_id: HabitId,
    pub owner_id: UserId,
    pub title: String,
    pub cadence: Cadence,
    pub updated_at: Timestamp,
}

domain_event!(
    HabitUpdated,
    event_type = "habit.updated.v1",
    schema_version = 1,
    aggregate_id = habit_id,
    aggregate_type = "Habit",
    occurred_at = updated_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// HabitStatusChanged
// ════════════════════════════════════════════════════════════════════════════

/// Published when a habit is paused, resumed or retired.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitStatusChanged {
    pub event_id: EventId,
    pub habit_id: HabitId,
    pub owner_id: UserId,
    pub from: HabitStatus,
    pub to: HabitStatus,
    pub changed_at: Timestamp,
}

domain_event!(
    HabitStatusChanged,
    event_type = "habit.status_changed.v1",
    schema_version = 1,
    aggregate_id = habit_id,
    aggregate_type = "Habit",
    occurred_at = changed_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// HabitCompleted
// ════════════════════════════════════════════════════════════════════════════

/// Published after a completion was applied to a habit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitCompleted {
    pub event_id: EventId,
    pub habit_id: HabitId,
    pub owner_id: UserId,
    pub quality: u8,
    pub xp_awarded: u32,
    pub repetitions: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub success_rate: u8,
    pub completed_at: Timestamp,
}

domain_event!(
    HabitCompleted,
    event_type = "habit.completed.v1",
    schema_version = 1,
    aggregate_id = habit_id,
    aggregate_type = "Habit",
    occurred_at = completed_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// ProgressionTriggered
// ════════════════════════════════════════════════════════════════════════════

/// Published when a steady habit enters promotion-pending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionTriggered {
    pub event_id: EventId,
    pub habit_id: HabitId,
    pub owner_id: UserId,
    pub current_tier: DifficultyTier,
    pub next_tier: DifficultyTier,
    pub triggered_at: Timestamp,
}

domain_event!(
    ProgressionTriggered,
    event_type = "habit.progression_triggered.v1",
    schema_version = 1,
    aggregate_id = habit_id,
    aggregate_type = "Habit",
    occurred_at = triggered_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// HabitPromoted
// ════════════════════════════════════════════════════════════════════════════

/// Published when an accepted proposal moved the habit up one tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitPromoted {
    pub event_id: EventId,
    pub habit_id: HabitId,
    pub owner_id: UserId,
    pub from_tier: DifficultyTier,
    pub to_tier: DifficultyTier,
    pub title: String,
    pub promoted_at: Timestamp,
}

domain_event!(
    HabitPromoted,
    event_type = "habit.promoted.v1",
    schema_version = 1,
    aggregate_id = habit_id,
    aggregate_type = "Habit",
    occurred_at = promoted_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// SetbackDetected
// ════════════════════════════════════════════════════════════════════════════

/// Published once per finding of a detection pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetbackDetected {
    pub event_id: EventId,
    pub setback_id: SetbackId,
    pub habit_id: HabitId,
    pub owner_id: UserId,
    pub kind: SetbackKind,
    pub severity: SetbackSeverity,
    pub days_since_last: Option<u32>,
    pub detected_at: Timestamp,
}

domain_event!(
    SetbackDetected,
    event_type = "habit.setback_detected.v1",
    schema_version = 1,
    aggregate_id = habit_id,
    aggregate_type = "Habit",
    occurred_at = detected_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// RecoveryPlanReceived
// ════════════════════════════════════════════════════════════════════════════

/// Published when a recovery plan was stored for its owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryPlanReceived {
    pub event_id: EventId,
    pub plan_id: RecoveryPlanId,
    pub habit_id: HabitId,
    pub owner_id: UserId,
    pub setback_id: Option<SetbackId>,
    pub received_at: Timestamp,
}

domain_event!(
    RecoveryPlanReceived,
    event_type = "habit.recovery_plan_received.v1",
    schema_version = 1,
    aggregate_id = habit_id,
    aggregate_type = "Habit",
    occurred_at = received_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// CollaboratorRequestFailed
// ════════════════════════════════════════════════════════════════════════════

/// Which one-way request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollaboratorRequestKind {
    RecoveryPlan,
    ProgressionProposal,
    PatternAnalysis,
}

impl fmt::Display for CollaboratorRequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollaboratorRequestKind::RecoveryPlan => write!(f, "recovery_plan"),
            CollaboratorRequestKind::ProgressionProposal => write!(f, "progression_proposal"),
            CollaboratorRequestKind::PatternAnalysis => write!(f, "pattern_analysis"),
        }
    }
}

/// Non-fatal notification for the UI layer. Habit state is unaffected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaboratorRequestFailed {
    pub event_id: EventId,
    pub habit_id: HabitId,
    pub owner_id: UserId,
    pub request: CollaboratorRequestKind,
    pub reason: String,
    pub failed_at: Timestamp,
}

domain_event!(
    CollaboratorRequestFailed,
    event_type = "habit.collaborator_request_failed.v1",
    schema_version = 1,
    aggregate_id = habit_id,
    aggregate_type = "Habit",
    occurred_at = failed_at,
    event_id = event_id
);
