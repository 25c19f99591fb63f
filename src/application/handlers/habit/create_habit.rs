//! CreateHabitHandler - Command handler for creating new habits.

use std::sync::Arc;
use tracing::debug;

use crate::application::{EngineNotice, HabitSession};
use crate::domain::foundation::{CommandMetadata, EventId, Percentage, Timestamp};
use crate::domain::habit::{
    Cadence, DifficultyTier, Habit, HabitCreated, HabitDefinition, HabitError, ProgressionRule,
};
use crate::ports::EventPublisher;

use super::publish_event;

/// Command to create a new habit.
///
/// `cadence` is the raw user input and goes through the frequency resolver.
#[derive(Debug, Clone)]
pub struct CreateHabitCommand {
    pub title: String,
    pub description: Option<String>,
    pub cadence: String,
    pub difficulty: Option<DifficultyTier>,
    pub streak_threshold: Option<u32>,
    pub success_rate_threshold: Option<u8>,
}

impl CreateHabitCommand {
    pub fn new(title: impl Into<String>, cadence: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            cadence: cadence.into(),
            difficulty: None,
            streak_threshold: None,
            success_rate_threshold: None,
        }
    }
}

/// Result of successful habit creation.
#[derive(Debug, Clone)]
pub struct CreateHabitResult {
    pub habit: Habit,
    pub event: HabitCreated,
    pub notices: Vec<EngineNotice>,
}

/// Handler for creating habits.
pub struct CreateHabitHandler {
    event_publisher: Arc<dyn EventPublisher>,
    default_rule: ProgressionRule,
}

impl CreateHabitHandler {
    pub fn new(event_publisher: Arc<dyn EventPublisher>, default_rule: ProgressionRule) -> Self {
        Self {
            event_publisher,
            default_rule,
        }
    }

    pub async fn handle(
        &self,
        session: &HabitSession,
        cmd: CreateHabitCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateHabitResult, HabitError> {
        // 1. Authorize - habits are only created in the actor's own session
        session.authorize(&metadata.user_id)?;

        // 2. Resolve cadence and progression rule
        let cadence: Cadence = cmd.cadence.parse()?;
        let rule = match (cmd.streak_threshold, cmd.success_rate_threshold) {
            (None, None) => self.default_rule,
            (streak, rate) => ProgressionRule::new(
                streak.unwrap_or(self.default_rule.streak_threshold()),
                Some(
                    rate.map(Percentage::try_new)
                        .transpose()?
                        .unwrap_or(self.default_rule.success_rate_threshold()),
                ),
            )?,
        };

        // 3. Create aggregate
        let mut definition = HabitDefinition::new(cmd.title, cadence)
            .with_difficulty(cmd.difficulty.unwrap_or_default())
            .with_progression_rule(rule);
        definition.description = cmd.description;
        let habit = Habit::new(metadata.user_id.clone(), definition, Timestamp::now())?;

        // 4. Persist, then add to session
        let habit = session.create(habit).await?;
        debug!(habit_id = %habit.id(), cadence = %cadence, "Habit created");

        // 5. Publish event
        let event = HabitCreated {
            event_id: EventId::new(),
            habit_id: *habit.id(),
            owner_id: habit.owner_id().clone(),
            title: habit.title().to_string(),
            cadence,
            difficulty: habit.difficulty(),
            created_at: *habit.created_at(),
        };
        let mut notices = Vec::new();
        publish_event(self.event_publisher.as_ref(), &metadata, &event, &mut notices).await;

        Ok(CreateHabitResult {
            habit,
            event,
            notices,
        })
    }
}
