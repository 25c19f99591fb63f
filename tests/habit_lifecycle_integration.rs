//! Integration tests for the habit lifecycle.
//!
//! These tests drive the command handlers end to end against the file
//! store:
//! 1. Create a habit and record completions
//! 2. Reload the owner's session from disk and compare
//! 3. Reach promotion, accept the next level
//! 4. Let the habit lapse, scan for setbacks, store the recovery plan
//!
//! Collaborators are the in-memory coaching service and event bus.

use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

use habit_engine::adapters::{
    CoachingRequest, FileHabitStore, InMemoryCoachingService, InMemoryEventBus,
    InMemoryRecoveryPlanRepository,
};
use habit_engine::application::{
    AcceptProgressionCommand, AcceptProgressionHandler, CreateHabitCommand, CreateHabitHandler,
    HabitSession, OutboundDispatcher, ReceiveRecoveryPlanCommand, ReceiveRecoveryPlanHandler,
    RecordCompletionCommand, RecordCompletionHandler, ScanSetbacksCommand, ScanSetbacksHandler,
};
use habit_engine::domain::foundation::{CommandMetadata, Timestamp, UserId};
use habit_engine::domain::habit::{
    Cadence, DifficultyTier, ProgressionDecision, ProgressionRule, ProgressionState,
    SetbackSeverity,
};
use habit_engine::ports::{HabitStore, RecoveryPlanRepository};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct Engine {
    _dir: TempDir,
    store: Arc<FileHabitStore>,
    coaching: InMemoryCoachingService,
    bus: Arc<InMemoryEventBus>,
    plans: InMemoryRecoveryPlanRepository,
}

impl Engine {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(FileHabitStore::new(dir.path()));
        Self {
            _dir: dir,
            store,
            coaching: InMemoryCoachingService::new(),
            bus: Arc::new(InMemoryEventBus::new()),
            plans: InMemoryRecoveryPlanRepository::new(),
        }
    }

    async fn session(&self) -> HabitSession {
        let store: Arc<dyn HabitStore> = self.store.clone();
        HabitSession::load(owner(), store).await.unwrap()
    }

    fn dispatcher(&self) -> OutboundDispatcher {
        OutboundDispatcher::new(
            Arc::new(self.coaching.clone()),
            Arc::new(self.coaching.clone()),
            self.bus.clone(),
        )
    }

    fn create_handler(&self) -> CreateHabitHandler {
        CreateHabitHandler::new(self.bus.clone(), ProgressionRule::default())
    }

    fn completion_handler(&self) -> RecordCompletionHandler {
        RecordCompletionHandler::new(
            Arc::new(self.coaching.clone()),
            self.dispatcher(),
            self.bus.clone(),
            7,
        )
    }
}

fn owner() -> UserId {
    UserId::new("integration-owner").unwrap()
}

fn metadata() -> CommandMetadata {
    CommandMetadata::new(owner()).with_source("integration-test")
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn completions_survive_a_reload() {
    let engine = Engine::new();
    let session = engine.session().await;

    let habit = engine
        .create_handler()
        .handle(&session, CreateHabitCommand::new("Read 10 pages", "daily"), metadata())
        .await
        .unwrap()
        .habit;

    let handler = engine.completion_handler();
    let start = Timestamp::now().minus_days(3);
    for day in 0..3 {
        let cmd = RecordCompletionCommand::new(*habit.id(), 8).at(start.plus_days(day));
        let result = handler.handle(&session, cmd, metadata()).await.unwrap();
        assert!(result.notices.is_empty());
    }

    let in_memory = session.get(habit.id()).await.unwrap();
    assert_eq!(in_memory.repetitions(), 3);
    assert_eq!(in_memory.metrics().current_streak, 3);

    let reloaded = engine.session().await;
    assert_eq!(reloaded.get(habit.id()).await.unwrap(), in_memory);
    assert_eq!(engine.store.list_owners().await.unwrap(), vec![owner()]);
    assert_eq!(engine.bus.events_of_type("habit.completed.v1").len(), 3);
}

#[tokio::test]
async fn seven_day_streak_promotes_to_next_tier() {
    let engine = Engine::new();
    let session = engine.session().await;

    let mut cmd = CreateHabitCommand::new("Push-ups", "daily");
    cmd.success_rate_threshold = Some(20);
    let habit = engine
        .create_handler()
        .handle(&session, cmd, metadata())
        .await
        .unwrap()
        .habit;

    let handler = engine.completion_handler();
    let start = Timestamp::now().minus_days(6);
    let mut last = None;
    for day in 0..7 {
        let cmd = RecordCompletionCommand::new(*habit.id(), 9).at(start.plus_days(day));
        let mut result = handler.handle(&session, cmd, metadata()).await.unwrap();
        for handle in result.dispatched.drain(..) {
            handle.await.unwrap();
        }
        last = Some(result);
    }

    let last = last.unwrap();
    assert_eq!(last.habit.metrics().current_streak, 7);
    assert_eq!(
        last.decision,
        ProgressionDecision::RequestProposal {
            next_tier: DifficultyTier::Small,
            newly_triggered: true,
        }
    );
    let requests = engine.coaching.requests();
    assert!(requests
        .iter()
        .any(|r| matches!(r, CoachingRequest::NextLevelProposal { .. })));
    assert!(requests
        .iter()
        .any(|r| matches!(r, CoachingRequest::PatternAnalysis { .. })));

    let promoted = AcceptProgressionHandler::new(engine.bus.clone())
        .handle(
            &session,
            AcceptProgressionCommand {
                habit_id: *habit.id(),
                variant: None,
            },
            metadata(),
        )
        .await
        .unwrap()
        .habit;
    assert_eq!(promoted.difficulty(), DifficultyTier::Small);
    assert_eq!(promoted.progression_state(), ProgressionState::Steady);
    assert_eq!(promoted.repetitions(), 7);

    let reloaded = engine.session().await;
    assert_eq!(reloaded.get(habit.id()).await.unwrap().difficulty(), DifficultyTier::Small);
}

#[tokio::test]
async fn lapsed_habit_gets_a_recovery_plan() {
    let engine = Engine::new();
    let session = engine.session().await;

    let habit = engine
        .create_handler()
        .handle(&session, CreateHabitCommand::new("Evening walk", "weekly"), metadata())
        .await
        .unwrap()
        .habit;
    let done_at = Timestamp::now().minus_days(60);
    engine
        .completion_handler()
        .handle(
            &session,
            RecordCompletionCommand::new(*habit.id(), 6).at(done_at),
            metadata(),
        )
        .await
        .unwrap();
    assert_eq!(habit.cadence(), Cadence::Weekly);

    let mut scan = ScanSetbacksHandler::new(engine.dispatcher(), engine.bus.clone())
        .handle(&session, ScanSetbacksCommand::default(), metadata())
        .await
        .unwrap();
    for handle in scan.dispatched.drain(..) {
        handle.await.unwrap();
    }

    assert_eq!(scan.setbacks.len(), 1);
    let setback = scan.setbacks[0].clone();
    assert_eq!(setback.severity, SetbackSeverity::Major);
    assert!(engine.coaching.requests().contains(&CoachingRequest::RecoveryPlan {
        owner_id: owner(),
        habit_id: *habit.id(),
        setback_id: setback.id,
    }));

    let plan = ReceiveRecoveryPlanHandler::new(Arc::new(engine.plans.clone()), engine.bus.clone())
        .handle(
            &session,
            ReceiveRecoveryPlanCommand {
                habit_id: *habit.id(),
                setback_id: Some(setback.id),
                body: json!({"steps": ["Walk 5 minutes after dinner"]}),
            },
            metadata(),
        )
        .await
        .unwrap()
        .plan;

    assert_eq!(engine.plans.list_for_owner(&owner()).await.unwrap(), vec![plan]);
    assert!(engine.bus.has_event("habit.setback_detected.v1"));
    assert!(engine.bus.has_event("habit.recovery_plan_received.v1"));
}
