//! UpdateHabitHandler - Command handler for editing a habit's definition.

use std::sync::Arc;
use tracing::debug;

use crate::application::{EngineNotice, HabitSession};
use crate::domain::foundation::{CommandMetadata, EventId, HabitId, Percentage, Timestamp};
use crate::domain::habit::{Cadence, Habit, HabitEdit, HabitError, HabitUpdated, ProgressionRule};
use crate::ports::EventPublisher;

use super::{flush_or_notice, publish_event};

/// Command to edit a habit. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateHabitCommand {
    pub habit_id: HabitId,
    pub title: Option<String>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
    pub cadence: Option<String>,
    pub streak_threshold: Option<u32>,
    pub success_rate_threshold: Option<u8>,
}

impl UpdateHabitCommand {
    pub fn new(habit_id: HabitId) -> Self {
        Self {
            habit_id,
            ..Default::default()
        }
    }
}

/// Result of a successful edit.
#[derive(Debug, Clone)]
pub struct UpdateHabitResult {
    pub habit: Habit,
    pub notices: Vec<EngineNotice>,
}

/// Handler for editing habits.
pub struct UpdateHabitHandler {
    event_publisher: Arc<dyn EventPublisher>,
}

impl UpdateHabitHandler {
    pub fn new(event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self { event_publisher }
    }

    pub async fn handle(
        &self,
        session: &HabitSession,
        cmd: UpdateHabitCommand,
        metadata: CommandMetadata,
    ) -> Result<UpdateHabitResult, HabitError> {
        let cadence: Option<Cadence> = cmd.cadence.as_deref().map(str::parse).transpose()?;
        let success_rate = cmd
            .success_rate_threshold
            .map(Percentage::try_new)
            .transpose()?;
        let thresholds_changed = cmd.streak_threshold.is_some() || success_rate.is_some();

        let edit = HabitEdit {
            title: cmd.title,
            description: cmd.description,
            cadence,
            progression_rule: None,
        };
        if edit.is_empty() && !thresholds_changed {
            return Err(HabitError::validation("habit", "No changes requested"));
        }

        let now = Timestamp::now();
        let habit = session
            .update_with(&metadata.user_id, &cmd.habit_id, |current| {
                let mut edit = edit;
                if thresholds_changed {
                    let rule = current.progression_rule();
                    edit.progression_rule = Some(ProgressionRule::new(
                        cmd.streak_threshold.unwrap_or(rule.streak_threshold()),
                        Some(success_rate.unwrap_or(rule.success_rate_threshold())),
                    )?);
                }
                current.update_definition(edit, &now)
            })
            .await?;
        debug!(habit_id = %cmd.habit_id, "Habit definition updated");

        let mut notices = Vec::new();
        flush_or_notice(session, &cmd.habit_id, &mut notices).await;

        let event = HabitUpdated {
            event_id: EventId::new(),
            habit_id: cmd.habit_id,
            owner_id: metadata.user_id.clone(),
            title: habit.title().to_string(),
            cadence: habit.cadence(),
            updated_at: now,
        };
        publish_event(self.event_publisher.as_ref(), &metadata, &event, &mut notices).await;

        Ok(UpdateHabitResult { habit, notices })
    }
}
