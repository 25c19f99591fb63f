//! In-memory coaching service for tests and offline runs.
//!
//! Records every request it receives. Failures can be switched on per
//! request family to exercise the non-fatal error paths.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::foundation::{HabitId, SetbackId, UserId};
use crate::domain::habit::{DifficultyTier, HabitContext, SetbackEvent};
use crate::ports::{CoachingAdvisor, CollaboratorError, ProgressLedger, RecoveryPlanner};

/// A request received by the in-memory service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoachingRequest {
    RecoveryPlan {
        owner_id: UserId,
        habit_id: HabitId,
        setback_id: SetbackId,
    },
    NextLevelProposal {
        owner_id: UserId,
        habit_id: HabitId,
        next_tier: DifficultyTier,
    },
    PatternAnalysis {
        owner_id: UserId,
        habit_id: HabitId,
    },
    Award {
        owner_id: UserId,
        event_type: String,
        xp: u32,
    },
}

#[derive(Debug, Default)]
struct FailureSwitches {
    recovery: AtomicBool,
    advisor: AtomicBool,
    ledger: AtomicBool,
}

/// In-memory implementation of all three collaborator ports.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCoachingService {
    requests: Arc<Mutex<Vec<CoachingRequest>>>,
    failures: Arc<FailureSwitches>,
}

impl InMemoryCoachingService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes recovery plan requests fail.
    pub fn fail_recovery_requests(&self, fail: bool) {
        self.failures.recovery.store(fail, Ordering::SeqCst);
    }

    /// Makes proposal and analysis requests fail.
    pub fn fail_advisor_requests(&self, fail: bool) {
        self.failures.advisor.store(fail, Ordering::SeqCst);
    }

    /// Makes ledger awards fail.
    pub fn fail_awards(&self, fail: bool) {
        self.failures.ledger.store(fail, Ordering::SeqCst);
    }

    /// Requests that were accepted, in arrival order.
    pub fn requests(&self) -> Vec<CoachingRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Total XP awarded to an owner.
    pub fn total_xp(&self, owner_id: &UserId) -> u32 {
        self.requests()
            .iter()
            .filter_map(|r| match r {
                CoachingRequest::Award { owner_id: o, xp, .. } if o == owner_id => Some(*xp),
                _ => None,
            })
            .sum()
    }

    fn record(&self, request: CoachingRequest) {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
    }

    fn check(switch: &AtomicBool, what: &str) -> Result<(), CollaboratorError> {
        if switch.load(Ordering::SeqCst) {
            return Err(CollaboratorError::unavailable(format!("{} disabled", what)));
        }
        Ok(())
    }
}

#[async_trait]
impl RecoveryPlanner for InMemoryCoachingService {
    async fn request_plan(
        &self,
        owner_id: &UserId,
        setback: &SetbackEvent,
        habit: &HabitContext,
    ) -> Result<(), CollaboratorError> {
        Self::check(&self.failures.recovery, "recovery planner")?;
        self.record(CoachingRequest::RecoveryPlan {
            owner_id: owner_id.clone(),
            habit_id: habit.habit_id,
            setback_id: setback.id,
        });
        Ok(())
    }
}

#[async_trait]
impl CoachingAdvisor for InMemoryCoachingService {
    async fn propose_next_level(
        &self,
        owner_id: &UserId,
        habit: &HabitContext,
        next_tier: DifficultyTier,
    ) -> Result<(), CollaboratorError> {
        Self::check(&self.failures.advisor, "coaching advisor")?;
        self.record(CoachingRequest::NextLevelProposal {
            owner_id: owner_id.clone(),
            habit_id: habit.habit_id,
            next_tier,
        });
        Ok(())
    }

    async fn request_pattern_analysis(
        &self,
        owner_id: &UserId,
        habit: &HabitContext,
    ) -> Result<(), CollaboratorError> {
        Self::check(&self.failures.advisor, "coaching advisor")?;
        self.record(CoachingRequest::PatternAnalysis {
            owner_id: owner_id.clone(),
            habit_id: habit.habit_id,
        });
        Ok(())
    }
}

#[async_trait]
impl ProgressLedger for InMemoryCoachingService {
    async fn award(&self, owner_id: &UserId, event_type: &str, xp: u32) -> Result<(), CollaboratorError> {
        Self::check(&self.failures.ledger, "progress ledger")?;
        self.record(CoachingRequest::Award {
            owner_id: owner_id.clone(),
            event_type: event_type.to_string(),
            xp,
        });
        Ok(())
    }
}
