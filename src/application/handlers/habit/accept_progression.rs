//! AcceptProgressionHandler - Command handler for accepting a next-level proposal.

use std::sync::Arc;
use tracing::info;

use crate::application::{EngineNotice, HabitSession};
use crate::domain::foundation::{CommandMetadata, EventId, HabitId, Timestamp};
use crate::domain::habit::{DifficultyTier, Habit, HabitError, HabitPromoted, ProgressionVariant};
use crate::ports::EventPublisher;

use super::{flush_or_notice, publish_event};

/// Command to accept the pending promotion of a habit.
///
/// `variant` carries the proposal the user accepted, if it changes the
/// habit's wording.
#[derive(Debug, Clone)]
pub struct AcceptProgressionCommand {
    pub habit_id: HabitId,
    pub variant: Option<ProgressionVariant>,
}

/// Result of an accepted promotion.
#[derive(Debug, Clone)]
pub struct AcceptProgressionResult {
    pub habit: Habit,
    pub from_tier: DifficultyTier,
    pub notices: Vec<EngineNotice>,
}

/// Handler for accepting promotions.
pub struct AcceptProgressionHandler {
    event_publisher: Arc<dyn EventPublisher>,
}

impl AcceptProgressionHandler {
    pub fn new(event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self { event_publisher }
    }

    pub async fn handle(
        &self,
        session: &HabitSession,
        cmd: AcceptProgressionCommand,
        metadata: CommandMetadata,
    ) -> Result<AcceptProgressionResult, HabitError> {
        let now = Timestamp::now();
        let mut from_tier = DifficultyTier::default();
        let habit = session
            .update_with(&metadata.user_id, &cmd.habit_id, |current| {
                from_tier = current.difficulty();
                current.accept_promotion(cmd.variant, &now)
            })
            .await?;
        info!(
            habit_id = %cmd.habit_id,
            from = %from_tier,
            to = %habit.difficulty(),
            "Habit promoted"
        );

        let mut notices = Vec::new();
        flush_or_notice(session, &cmd.habit_id, &mut notices).await;

        let event = HabitPromoted {
            event_id: EventId::new(),
            habit_id: cmd.habit_id,
            owner_id: metadata.user_id.clone(),
            from_tier,
            to_tier: habit.difficulty(),
            title: habit.title().to_string(),
            promoted_at: now,
        };
        publish_event(self.event_publisher.as_ref(), &metadata, &event, &mut notices).await;

        Ok(AcceptProgressionResult {
            habit,
            from_tier,
            notices,
        })
    }
}
