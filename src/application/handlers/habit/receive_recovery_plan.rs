//! ReceiveRecoveryPlanHandler - Stores a plan delivered by the recovery planner.
//!
//! The plan body is opaque; it is stored as received and never interpreted.

use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::info;

use crate::application::{EngineNotice, HabitSession};
use crate::domain::foundation::{CommandMetadata, EventId, HabitId, SetbackId, Timestamp};
use crate::domain::habit::{HabitError, RecoveryPlan, RecoveryPlanReceived};
use crate::ports::{EventPublisher, RecoveryPlanRepository};

use super::publish_event;

/// Command carrying a plan for one of the session's habits.
#[derive(Debug, Clone)]
pub struct ReceiveRecoveryPlanCommand {
    pub habit_id: HabitId,
    pub setback_id: Option<SetbackId>,
    pub body: JsonValue,
}

/// Result of a stored plan.
#[derive(Debug, Clone)]
pub struct ReceiveRecoveryPlanResult {
    pub plan: RecoveryPlan,
    pub notices: Vec<EngineNotice>,
}

/// Handler for incoming recovery plans.
pub struct ReceiveRecoveryPlanHandler {
    repository: Arc<dyn RecoveryPlanRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl ReceiveRecoveryPlanHandler {
    pub fn new(
        repository: Arc<dyn RecoveryPlanRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        session: &HabitSession,
        cmd: ReceiveRecoveryPlanCommand,
        metadata: CommandMetadata,
    ) -> Result<ReceiveRecoveryPlanResult, HabitError> {
        session.authorize(&metadata.user_id)?;
        let habit = session.get(&cmd.habit_id).await?;

        let plan = RecoveryPlan::new(
            habit.owner_id().clone(),
            cmd.habit_id,
            cmd.setback_id,
            cmd.body,
            Timestamp::now(),
        )?;
        self.repository
            .save(&plan)
            .await
            .map_err(|e| HabitError::persistence(e.to_string()))?;
        info!(habit_id = %plan.habit_id, plan_id = %plan.id, "Recovery plan stored");

        let event = RecoveryPlanReceived {
            event_id: EventId::new(),
            plan_id: plan.id,
            habit_id: plan.habit_id,
            owner_id: plan.owner_id.clone(),
            setback_id: plan.setback_id,
            received_at: plan.received_at,
        };
        let mut notices = Vec::new();
        publish_event(self.event_publisher.as_ref(), &metadata, &event, &mut notices).await;

        Ok(ReceiveRecoveryPlanResult { plan, notices })
    }
}
