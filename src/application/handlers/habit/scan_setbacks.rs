//! ScanSetbacksHandler - Runs one setback detection pass over a session.
//!
//! Every finding is published and handed to the recovery planner. The
//! pass never changes habit state.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::application::{EngineNotice, HabitSession, OutboundDispatcher};
use crate::domain::foundation::{CommandMetadata, EventId, Timestamp};
use crate::domain::habit::{HabitError, SetbackDetected, SetbackDetector, SetbackEvent};
use crate::ports::EventPublisher;

use super::publish_event;

/// Command to scan all habits of the session.
#[derive(Debug, Clone, Default)]
pub struct ScanSetbacksCommand {
    /// Reference instant; defaults to the time of handling.
    pub now: Option<Timestamp>,
}

/// Result of a detection pass.
#[derive(Debug)]
pub struct ScanSetbacksResult {
    pub setbacks: Vec<SetbackEvent>,
    pub dispatched: Vec<JoinHandle<()>>,
    pub notices: Vec<EngineNotice>,
}

/// Handler for setback detection passes.
pub struct ScanSetbacksHandler {
    dispatcher: OutboundDispatcher,
    event_publisher: Arc<dyn EventPublisher>,
}

impl ScanSetbacksHandler {
    pub fn new(dispatcher: OutboundDispatcher, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            dispatcher,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        session: &HabitSession,
        cmd: ScanSetbacksCommand,
        metadata: CommandMetadata,
    ) -> Result<ScanSetbacksResult, HabitError> {
        session.authorize(&metadata.user_id)?;

        let now = cmd.now.unwrap_or_else(Timestamp::now);
        let habits = session.habits().await;
        let setbacks = SetbackDetector::scan(&habits, &now);

        let mut notices = Vec::new();
        let mut dispatched = Vec::with_capacity(setbacks.len());
        for setback in &setbacks {
            let event = SetbackDetected {
                event_id: EventId::new(),
                setback_id: setback.id,
                habit_id: setback.habit_id,
                owner_id: setback.owner_id.clone(),
                kind: setback.kind,
                severity: setback.severity,
                days_since_last: setback.context.days_since_last,
                detected_at: setback.detected_at,
            };
            publish_event(self.event_publisher.as_ref(), &metadata, &event, &mut notices).await;

            if let Some(habit) = habits.iter().find(|h| h.id() == &setback.habit_id) {
                dispatched.push(self.dispatcher.request_recovery_plan(
                    setback.clone(),
                    habit.context(),
                    metadata.clone(),
                ));
            }
        }

        info!(
            owner_id = %session.owner_id(),
            habits = habits.len(),
            setbacks = setbacks.len(),
            "Setback scan complete"
        );

        Ok(ScanSetbacksResult {
            setbacks,
            dispatched,
            notices,
        })
    }
}
