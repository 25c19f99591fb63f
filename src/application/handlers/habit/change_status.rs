//! ChangeHabitStatusHandler - Command handler for pausing, resuming and retiring habits.

use std::sync::Arc;
use tracing::info;

use crate::application::{EngineNotice, HabitSession};
use crate::domain::foundation::{CommandMetadata, EventId, HabitId, Timestamp};
use crate::domain::habit::{Habit, HabitError, HabitStatus, HabitStatusChanged};
use crate::ports::EventPublisher;

use super::{flush_or_notice, publish_event};

/// Command to move a habit to another lifecycle status.
#[derive(Debug, Clone)]
pub struct ChangeHabitStatusCommand {
    pub habit_id: HabitId,
    pub target: HabitStatus,
}

/// Result of a status change.
#[derive(Debug, Clone)]
pub struct ChangeHabitStatusResult {
    pub habit: Habit,
    pub previous: HabitStatus,
    pub notices: Vec<EngineNotice>,
}

/// Handler for lifecycle status changes.
pub struct ChangeHabitStatusHandler {
    event_publisher: Arc<dyn EventPublisher>,
}

impl ChangeHabitStatusHandler {
    pub fn new(event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self { event_publisher }
    }

    pub async fn handle(
        &self,
        session: &HabitSession,
        cmd: ChangeHabitStatusCommand,
        metadata: CommandMetadata,
    ) -> Result<ChangeHabitStatusResult, HabitError> {
        let now = Timestamp::now();
        let mut previous = HabitStatus::default();
        let habit = session
            .update_with(&metadata.user_id, &cmd.habit_id, |current| {
                previous = current.status();
                current.change_status(cmd.target, &now)
            })
            .await?;
        info!(
            habit_id = %cmd.habit_id,
            from = %previous,
            to = %cmd.target,
            "Habit status changed"
        );

        let mut notices = Vec::new();
        flush_or_notice(session, &cmd.habit_id, &mut notices).await;

        let event = HabitStatusChanged {
            event_id: EventId::new(),
            habit_id: cmd.habit_id,
            owner_id: metadata.user_id.clone(),
            from: previous,
            to: habit.status(),
            changed_at: now,
        };
        publish_event(self.event_publisher.as_ref(), &metadata, &event, &mut notices).await;

        Ok(ChangeHabitStatusResult {
            habit,
            previous,
            notices,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::habit::test_support::{metadata, owner, Fixture};

    fn command(habit: &Habit, target: HabitStatus) -> ChangeHabitStatusCommand {
        ChangeHabitStatusCommand {
            habit_id: *habit.id(),
            target,
        }
    }

    #[tokio::test]
    async fn pause_then_resume() {
        let fixture = Fixture::new().await;
        let habit = fixture.add_daily("Meditate").await;
        let handler = ChangeHabitStatusHandler::new(fixture.bus.clone());

        let paused = handler
            .handle(&fixture.session, command(&habit, HabitStatus::Paused), metadata())
            .await
            .unwrap();
        assert_eq!(paused.previous, HabitStatus::Active);
        assert_eq!(paused.habit.status(), HabitStatus::Paused);

        let resumed = handler
            .handle(&fixture.session, command(&habit, HabitStatus::Active), metadata())
            .await
            .unwrap();
        assert_eq!(resumed.habit.status(), HabitStatus::Active);

        let events = fixture.bus.events_of_type("habit.status_changed.v1");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].payload["to"], "paused");
        assert_eq!(events[1].payload["from"], "paused");
    }

    #[tokio::test]
    async fn retire_is_persisted_and_final() {
        let fixture = Fixture::new().await;
        let habit = fixture.add_daily("Meditate").await;
        let handler = ChangeHabitStatusHandler::new(fixture.bus.clone());

        handler
            .handle(&fixture.session, command(&habit, HabitStatus::Retired), metadata())
            .await
            .unwrap();
        let record = fixture.store.stored_record(&owner(), habit.id()).await.unwrap();
        assert_eq!(record.status, HabitStatus::Retired);

        let result = handler
            .handle(&fixture.session, command(&habit, HabitStatus::Active), metadata())
            .await;
        assert_eq!(result.unwrap_err(), HabitError::Retired);
    }

    #[tokio::test]
    async fn same_status_is_invalid() {
        let fixture = Fixture::new().await;
        let habit = fixture.add_daily("Meditate").await;

        let result = ChangeHabitStatusHandler::new(fixture.bus.clone())
            .handle(&fixture.session, command(&habit, HabitStatus::Active), metadata())
            .await;

        assert!(matches!(result, Err(HabitError::InvalidState(_))));
        assert_eq!(fixture.bus.event_count(), 0);
    }

    #[tokio::test]
    async fn unknown_habit_is_not_found() {
        let fixture = Fixture::new().await;
        let missing = HabitId::new();

        let result = ChangeHabitStatusHandler::new(fixture.bus.clone())
            .handle(
                &fixture.session,
                ChangeHabitStatusCommand {
                    habit_id: missing,
                    target: HabitStatus::Paused,
                },
                metadata(),
            )
            .await;

        assert_eq!(result.unwrap_err(), HabitError::NotFound(missing));
    }
}
