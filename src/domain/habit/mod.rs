//! Habit module - recurring behavioral commitments and their rules.
//!
//! Leaves first:
//! - `cadence` - Frequency Resolver
//! - `completion` - immutable repetitions and quality scores
//! - `streak` - streak and rolling success rate
//! - `reward` - XP per completion
//! - `progression` - steady / promotion-pending state machine
//! - `aggregate` - the `Habit` record and its pure reducer
//! - `setback` - lapse detection over active habits

mod aggregate;
mod cadence;
mod completion;
mod difficulty;
mod errors;
mod events;
mod progression;
mod recovery_plan;
mod reward;
mod setback;
mod status;
mod streak;

pub use aggregate::{
    AppliedCompletion, Habit, HabitContext, HabitDefinition, HabitEdit, HabitSnapshot,
    ProgressionVariant, MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH,
};
pub use cadence::{resolve_interval_days, Cadence, InvalidCadence};
pub use completion::{HabitCompletion, QualityScore, MAX_REFLECTION_LENGTH};
pub use difficulty::DifficultyTier;
pub use errors::HabitError;
pub use events::{
    CollaboratorRequestFailed, CollaboratorRequestKind, HabitCompleted, HabitCreated,
    HabitPromoted, HabitStatusChanged, HabitUpdated, ProgressionTriggered, RecoveryPlanReceived,
    SetbackDetected,
};
pub use progression::{
    ProgressionController, ProgressionDecision, ProgressionRule, ProgressionState,
    DEFAULT_STREAK_THRESHOLD, DEFAULT_SUCCESS_RATE_THRESHOLD,
};
pub use recovery_plan::RecoveryPlan;
pub use reward::{RewardCalculator, COMPLETION_AWARD_EVENT};
pub use setback::{SetbackContext, SetbackDetector, SetbackEvent, SetbackKind, SetbackSeverity};
pub use status::HabitStatus;
pub use streak::{HabitMetrics, StreakCalculator, SUCCESS_WINDOW_DAYS};
