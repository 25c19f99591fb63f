//! Outbound dispatcher - one-way collaborator requests on spawned tasks.
//!
//! Each request is sent at most once and never retried. The engine does not
//! wait for it and never depends on its outcome. A failure is logged and
//! turned into a `habit.collaborator_request_failed.v1` notification.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::domain::foundation::{CommandMetadata, EventId, SerializableDomainEvent, Timestamp};
use crate::domain::habit::{
    CollaboratorRequestFailed, CollaboratorRequestKind, DifficultyTier, HabitContext, SetbackEvent,
};
use crate::ports::{CoachingAdvisor, CollaboratorError, EventPublisher, RecoveryPlanner};

/// Spawns fire-and-forget requests to the coaching collaborators.
#[derive(Clone)]
pub struct OutboundDispatcher {
    recovery_planner: Arc<dyn RecoveryPlanner>,
    advisor: Arc<dyn CoachingAdvisor>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl OutboundDispatcher {
    pub fn new(
        recovery_planner: Arc<dyn RecoveryPlanner>,
        advisor: Arc<dyn CoachingAdvisor>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            recovery_planner,
            advisor,
            event_publisher,
        }
    }

    /// Requests a recovery plan for one setback.
    pub fn request_recovery_plan(
        &self,
        setback: SetbackEvent,
        habit: HabitContext,
        metadata: CommandMetadata,
    ) -> JoinHandle<()> {
        let planner = Arc::clone(&self.recovery_planner);
        let publisher = Arc::clone(&self.event_publisher);

        tokio::spawn(async move {
            let result = planner
                .request_plan(&setback.owner_id, &setback, &habit)
                .await;
            match result {
                Ok(()) => debug!(
                    habit_id = %habit.habit_id,
                    setback_id = %setback.id,
                    "Recovery plan requested"
                ),
                Err(e) => {
                    report_failure(
                        publisher.as_ref(),
                        &metadata,
                        &habit,
                        CollaboratorRequestKind::RecoveryPlan,
                        e,
                    )
                    .await
                }
            }
        })
    }

    /// Requests a concrete next-level variant for a pending habit.
    pub fn request_next_level(
        &self,
        habit: HabitContext,
        next_tier: DifficultyTier,
        metadata: CommandMetadata,
    ) -> JoinHandle<()> {
        let advisor = Arc::clone(&self.advisor);
        let publisher = Arc::clone(&self.event_publisher);

        tokio::spawn(async move {
            let result = advisor
                .propose_next_level(&metadata.user_id, &habit, next_tier)
                .await;
            match result {
                Ok(()) => debug!(
                    habit_id = %habit.habit_id,
                    next_tier = %next_tier,
                    "Next-level proposal requested"
                ),
                Err(e) => {
                    report_failure(
                        publisher.as_ref(),
                        &metadata,
                        &habit,
                        CollaboratorRequestKind::ProgressionProposal,
                        e,
                    )
                    .await
                }
            }
        })
    }

    /// Requests a pattern analysis of the habit's history.
    pub fn request_pattern_analysis(&self, habit: HabitContext, metadata: CommandMetadata) -> JoinHandle<()> {
        let advisor = Arc::clone(&self.advisor);
        let publisher = Arc::clone(&self.event_publisher);

        tokio::spawn(async move {
            match advisor.request_pattern_analysis(&metadata.user_id, &habit).await {
                Ok(()) => debug!(
                    habit_id = %habit.habit_id,
                    repetitions = habit.repetitions,
                    "Pattern analysis requested"
                ),
                Err(e) => {
                    report_failure(
                        publisher.as_ref(),
                        &metadata,
                        &habit,
                        CollaboratorRequestKind::PatternAnalysis,
                        e,
                    )
                    .await
                }
            }
        })
    }
}

async fn report_failure(
    publisher: &dyn EventPublisher,
    metadata: &CommandMetadata,
    habit: &HabitContext,
    request: CollaboratorRequestKind,
    err: CollaboratorError,
) {
    warn!(
        habit_id = %habit.habit_id,
        request = %request,
        error = %err,
        "Collaborator request failed"
    );

    let event = CollaboratorRequestFailed {
        event_id: EventId::new(),
        habit_id: habit.habit_id,
        owner_id: metadata.user_id.clone(),
        request,
        reason: err.to_string(),
        failed_at: Timestamp::now(),
    };

    let published = match event.to_envelope() {
        Ok(envelope) => publisher.publish(metadata.stamp(envelope)).await,
        Err(e) => Err(e),
    };
    if let Err(e) = published {
        error!(
            habit_id = %habit.habit_id,
            request = %request,
            error = %e,
            "Failed to publish collaborator failure notification"
        );
    }
}
