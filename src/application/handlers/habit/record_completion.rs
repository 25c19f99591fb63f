//! RecordCompletionHandler - Command handler for recording a repetition.
//!
//! Applies the completion to the session, awards XP, and fans out the
//! progression and analysis requests it triggers.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::application::{EngineNotice, HabitSession, OutboundDispatcher};
use crate::domain::foundation::{CommandMetadata, EventId, HabitId, Timestamp};
use crate::domain::habit::{
    HabitCompleted, Habit, HabitCompletion, HabitError, ProgressionDecision, ProgressionTriggered,
    QualityScore, RewardCalculator, COMPLETION_AWARD_EVENT,
};
use crate::ports::{EventPublisher, ProgressLedger};

use super::{flush_or_notice, publish_event};

/// Command to record one completion of a habit.
#[derive(Debug, Clone)]
pub struct RecordCompletionCommand {
    pub habit_id: HabitId,
    /// Defaults to the time of handling.
    pub completed_at: Option<Timestamp>,
    pub quality: u8,
    pub reflection: Option<String>,
}

impl RecordCompletionCommand {
    pub fn new(habit_id: HabitId, quality: u8) -> Self {
        Self {
            habit_id,
            completed_at: None,
            quality,
            reflection: None,
        }
    }

    pub fn at(mut self, completed_at: Timestamp) -> Self {
        self.completed_at = Some(completed_at);
        self
    }
}

/// Result of a recorded completion.
///
/// `dispatched` holds the outbound collaborator requests started by this
/// completion. Callers may drop the handles; the requests still run.
#[derive(Debug)]
pub struct RecordCompletionResult {
    pub habit: Habit,
    pub xp_awarded: u32,
    pub decision: ProgressionDecision,
    pub dispatched: Vec<JoinHandle<()>>,
    pub notices: Vec<EngineNotice>,
}

/// Handler for recording completions.
pub struct RecordCompletionHandler {
    ledger: Arc<dyn ProgressLedger>,
    dispatcher: OutboundDispatcher,
    event_publisher: Arc<dyn EventPublisher>,
    analysis_interval: u32,
}

impl RecordCompletionHandler {
    /// `analysis_interval` is the repetition count between pattern analyses;
    /// zero disables them.
    pub fn new(
        ledger: Arc<dyn ProgressLedger>,
        dispatcher: OutboundDispatcher,
        event_publisher: Arc<dyn EventPublisher>,
        analysis_interval: u32,
    ) -> Self {
        Self {
            ledger,
            dispatcher,
            event_publisher,
            analysis_interval,
        }
    }

    pub async fn handle(
        &self,
        session: &HabitSession,
        cmd: RecordCompletionCommand,
        metadata: CommandMetadata,
    ) -> Result<RecordCompletionResult, HabitError> {
        // 1. Build the completion
        let now = cmd.completed_at.unwrap_or_else(Timestamp::now);
        let quality = QualityScore::try_new(cmd.quality)?;
        let completion = HabitCompletion::new(now, quality, cmd.reflection)?;

        // 2. Apply in memory (authorizes, validates order and status)
        let applied = session
            .apply_completion(&metadata.user_id, &cmd.habit_id, completion, &now)
            .await?;
        let habit = applied.habit;
        let metrics = *habit.metrics();
        let xp = RewardCalculator::completion_xp(habit.difficulty(), metrics.current_streak, quality);

        info!(
            habit_id = %cmd.habit_id,
            repetitions = habit.repetitions(),
            current_streak = metrics.current_streak,
            xp = xp,
            "Completion recorded"
        );

        let mut notices = Vec::new();

        // 3. Persist queued writes
        flush_or_notice(session, &cmd.habit_id, &mut notices).await;

        // 4. Award XP
        if let Err(e) = self.ledger.award(&metadata.user_id, COMPLETION_AWARD_EVENT, xp).await {
            warn!(habit_id = %cmd.habit_id, xp = xp, error = %e, "XP award failed");
            notices.push(EngineNotice::LedgerAwardFailed {
                habit_id: cmd.habit_id,
                xp,
                reason: e.to_string(),
            });
        }

        // 5. Fan out collaborator requests
        let mut dispatched = Vec::new();
        if let ProgressionDecision::RequestProposal {
            next_tier,
            newly_triggered,
        } = applied.decision
        {
            if newly_triggered {
                let event = ProgressionTriggered {
                    event_id: EventId::new(),
                    habit_id: cmd.habit_id,
                    owner_id: metadata.user_id.clone(),
                    current_tier: habit.difficulty(),
                    next_tier,
                    triggered_at: now,
                };
                publish_event(self.event_publisher.as_ref(), &metadata, &event, &mut notices).await;
            }
            dispatched.push(self.dispatcher.request_next_level(
                habit.context(),
                next_tier,
                metadata.clone(),
            ));
        }
        if habit.is_analysis_due(self.analysis_interval) {
            dispatched.push(
                self.dispatcher
                    .request_pattern_analysis(habit.context(), metadata.clone()),
            );
        }

        // 6. Publish completion event
        let event = HabitCompleted {
            event_id: EventId::new(),
            habit_id: cmd.habit_id,
            owner_id: metadata.user_id.clone(),
            quality: quality.value(),
            xp_awarded: xp,
            repetitions: habit.repetitions(),
            current_streak: metrics.current_streak,
            longest_streak: metrics.longest_streak,
            success_rate: metrics.success_rate.value(),
            completed_at: now,
        };
        publish_event(self.event_publisher.as_ref(), &metadata, &event, &mut notices).await;

        Ok(RecordCompletionResult {
            habit,
            xp_awarded: xp,
            decision: applied.decision,
            dispatched,
            notices,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::CoachingRequest;
    use crate::application::handlers::habit::test_support::{intruder_metadata, metadata, owner, Fixture};
    use crate::domain::foundation::Percentage;
    use crate::domain::habit::{
        Cadence, DifficultyTier, HabitDefinition, HabitStatus, ProgressionRule, ProgressionState,
    };

    fn handler(fixture: &Fixture, analysis_interval: u32) -> RecordCompletionHandler {
        RecordCompletionHandler::new(
            Arc::new(fixture.coaching.clone()),
            fixture.dispatcher(),
            fixture.bus.clone(),
            analysis_interval,
        )
    }

    async fn join(result: &mut RecordCompletionResult) {
        for handle in result.dispatched.drain(..) {
            handle.await.unwrap();
        }
    }

    #[tokio::test]
    async fn records_awards_and_publishes() {
        let fixture = Fixture::new().await;
        let habit = fixture.add_daily("Stretch").await;

        let mut result = handler(&fixture, 0)
            .handle(
                &fixture.session,
                RecordCompletionCommand::new(*habit.id(), 8),
                metadata(),
            )
            .await
            .unwrap();
        join(&mut result).await;

        let expected_xp = RewardCalculator::completion_xp(
            DifficultyTier::Micro,
            1,
            QualityScore::try_new(8).unwrap(),
        );
        assert_eq!(result.xp_awarded, expected_xp);
        assert_eq!(result.habit.repetitions(), 1);
        assert_eq!(result.habit.metrics().current_streak, 1);
        assert_eq!(result.decision, ProgressionDecision::Hold);
        assert!(result.notices.is_empty());

        assert_eq!(fixture.coaching.total_xp(&owner()), expected_xp);
        assert_eq!(fixture.store.stored_completion_count(&owner(), habit.id()).await, 1);

        let events = fixture.bus.events_of_type("habit.completed.v1");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].payload["xp_awarded"], expected_xp);
    }

    #[tokio::test]
    async fn meeting_thresholds_requests_next_level_once_triggered() {
        let fixture = Fixture::new().await;
        let rule = ProgressionRule::new(1, Some(Percentage::new(0))).unwrap();
        let habit = fixture
            .add_habit(
                HabitDefinition::new("Push-ups", Cadence::Daily).with_progression_rule(rule),
                Timestamp::now().minus_days(1),
            )
            .await;

        let mut result = handler(&fixture, 0)
            .handle(
                &fixture.session,
                RecordCompletionCommand::new(*habit.id(), 10),
                metadata(),
            )
            .await
            .unwrap();
        join(&mut result).await;

        assert_eq!(
            result.decision,
            ProgressionDecision::RequestProposal {
                next_tier: DifficultyTier::Small,
                newly_triggered: true,
            }
        );
        assert_eq!(result.habit.progression_state(), ProgressionState::PromotionPending);
        assert!(fixture.bus.has_event("habit.progression_triggered.v1"));
        assert!(fixture.coaching.requests().iter().any(|r| matches!(
            r,
            CoachingRequest::NextLevelProposal { next_tier: DifficultyTier::Small, .. }
        )));
    }

    #[tokio::test]
    async fn analysis_is_requested_on_interval() {
        let fixture = Fixture::new().await;
        let habit = fixture.add_daily("Journal").await;
        let handler = handler(&fixture, 2);
        let start = Timestamp::now();

        for (offset, expected) in [(0, 0), (1, 1)] {
            let cmd = RecordCompletionCommand::new(*habit.id(), 7).at(start.plus_hours(offset));
            let mut result = handler.handle(&fixture.session, cmd, metadata()).await.unwrap();
            join(&mut result).await;

            let analyses = fixture
                .coaching
                .requests()
                .into_iter()
                .filter(|r| matches!(r, CoachingRequest::PatternAnalysis { .. }))
                .count();
            assert_eq!(analyses, expected);
        }
    }

    #[tokio::test]
    async fn backfilled_completion_measures_success_rate_at_its_own_time() {
        let fixture = Fixture::new().await;
        let start = Timestamp::now().minus_days(50);
        let habit = fixture
            .add_habit(HabitDefinition::new("Journal", Cadence::Daily), start)
            .await;
        let handler = handler(&fixture, 0);

        let mut last = None;
        for day in 0..3 {
            let cmd = RecordCompletionCommand::new(*habit.id(), 7).at(start.plus_days(day));
            last = Some(handler.handle(&fixture.session, cmd, metadata()).await.unwrap());
        }
        let result = last.unwrap();

        // Window ends at the last backfilled instant, not at the time of handling.
        assert_eq!(result.habit.metrics().success_rate, Percentage::new(10));
        assert_eq!(result.habit.metrics().current_streak, 3);
        assert_eq!(*result.habit.updated_at(), start.plus_days(2));
    }

    #[tokio::test]
    async fn ledger_failure_is_a_notice() {
        let fixture = Fixture::new().await;
        fixture.coaching.fail_awards(true);
        let habit = fixture.add_daily("Read").await;

        let result = handler(&fixture, 0)
            .handle(
                &fixture.session,
                RecordCompletionCommand::new(*habit.id(), 5),
                metadata(),
            )
            .await
            .unwrap();

        assert!(matches!(
            result.notices.as_slice(),
            [EngineNotice::LedgerAwardFailed { .. }]
        ));
        assert_eq!(fixture.session.get(habit.id()).await.unwrap().repetitions(), 1);
    }

    #[tokio::test]
    async fn store_failure_keeps_completion_in_memory() {
        let fixture = Fixture::new().await;
        let habit = fixture.add_daily("Read").await;
        fixture.store.set_fail_writes(true);

        let result = handler(&fixture, 0)
            .handle(
                &fixture.session,
                RecordCompletionCommand::new(*habit.id(), 5),
                metadata(),
            )
            .await
            .unwrap();

        assert!(result.notices.iter().any(EngineNotice::is_persistence_failure));
        assert_eq!(fixture.session.get(habit.id()).await.unwrap().repetitions(), 1);
        assert_eq!(fixture.session.pending_count().await, 2);
        assert_eq!(fixture.store.stored_completion_count(&owner(), habit.id()).await, 0);
    }

    #[tokio::test]
    async fn paused_habit_rejects_completion() {
        let fixture = Fixture::new().await;
        let habit = fixture.add_daily("Run").await;
        fixture
            .session
            .update_with(&owner(), habit.id(), |h| {
                h.change_status(HabitStatus::Paused, &Timestamp::now())
            })
            .await
            .unwrap();

        let result = handler(&fixture, 0)
            .handle(
                &fixture.session,
                RecordCompletionCommand::new(*habit.id(), 5),
                metadata(),
            )
            .await;

        assert!(matches!(result, Err(HabitError::InvalidState(_))));
        assert_eq!(fixture.coaching.total_xp(&owner()), 0);
    }

    #[tokio::test]
    async fn invalid_quality_is_rejected() {
        let fixture = Fixture::new().await;
        let habit = fixture.add_daily("Run").await;

        let result = handler(&fixture, 0)
            .handle(
                &fixture.session,
                RecordCompletionCommand::new(*habit.id(), 11),
                metadata(),
            )
            .await;

        assert!(matches!(result, Err(HabitError::ValidationFailed { .. })));
        assert_eq!(fixture.session.get(habit.id()).await.unwrap().repetitions(), 0);
    }

    #[tokio::test]
    async fn other_user_is_forbidden() {
        let fixture = Fixture::new().await;
        let habit = fixture.add_daily("Run").await;

        let result = handler(&fixture, 0)
            .handle(
                &fixture.session,
                RecordCompletionCommand::new(*habit.id(), 5),
                intruder_metadata(),
            )
            .await;

        assert_eq!(result.unwrap_err(), HabitError::Forbidden);
    }
}
