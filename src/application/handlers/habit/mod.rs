//! Habit command handlers.
//!
//! Every handler works against one owner's `HabitSession`, applies its
//! change in memory, flushes the pending writes and publishes events.
//! I/O failures after the in-memory change are returned as notices.

mod accept_progression;
mod change_status;
mod create_habit;
mod receive_recovery_plan;
mod record_completion;
mod scan_setbacks;
mod update_habit;

pub use accept_progression::{
    AcceptProgressionCommand, AcceptProgressionHandler, AcceptProgressionResult,
};
pub use change_status::{
    ChangeHabitStatusCommand, ChangeHabitStatusHandler, ChangeHabitStatusResult,
};
pub use create_habit::{CreateHabitCommand, CreateHabitHandler, CreateHabitResult};
pub use receive_recovery_plan::{
    ReceiveRecoveryPlanCommand, ReceiveRecoveryPlanHandler, ReceiveRecoveryPlanResult,
};
pub use record_completion::{
    RecordCompletionCommand, RecordCompletionHandler, RecordCompletionResult,
};
pub use scan_setbacks::{ScanSetbacksCommand, ScanSetbacksHandler, ScanSetbacksResult};
pub use update_habit::{UpdateHabitCommand, UpdateHabitHandler, UpdateHabitResult};

use tracing::warn;

use crate::application::{EngineNotice, HabitSession};
use crate::domain::foundation::{CommandMetadata, HabitId, SerializableDomainEvent};
use crate::ports::EventPublisher;

/// Publishes one event; a failure becomes a notice.
async fn publish_event<E: SerializableDomainEvent>(
    publisher: &dyn EventPublisher,
    metadata: &CommandMetadata,
    event: &E,
    notices: &mut Vec<EngineNotice>,
) {
    let result = match event.to_envelope() {
        Ok(envelope) => publisher.publish(metadata.stamp(envelope)).await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        warn!(
            event_type = event.event_type(),
            error = %e,
            "Failed to publish domain event"
        );
        notices.push(EngineNotice::EventPublishFailed {
            event_type: event.event_type().to_string(),
            reason: e.to_string(),
        });
    }
}

/// Flushes the session's pending writes; a failure becomes a notice.
async fn flush_or_notice(session: &HabitSession, habit_id: &HabitId, notices: &mut Vec<EngineNotice>) {
    if let Err(e) = session.flush_pending().await {
        notices.push(EngineNotice::PersistenceFailed {
            habit_id: *habit_id,
            reason: e.to_string(),
            pending_writes: session.pending_count().await,
        });
    }
}
