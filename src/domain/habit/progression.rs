//! Progression Controller - decides when a habit has earned the next rung.
//!
//! The controller only decides *that* progression is warranted. What the next
//! variant of the habit looks like is proposed by the coaching advisor and
//! applied through `Habit::accept_promotion`.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Percentage, StateMachine, ValidationError};

use super::{DifficultyTier, HabitMetrics};

/// Success rate required for promotion when none is configured.
pub const DEFAULT_SUCCESS_RATE_THRESHOLD: u8 = 80;

/// Streak required for promotion when none is configured.
pub const DEFAULT_STREAK_THRESHOLD: u32 = 7;

/// Thresholds that together gate promotion to the next difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionRule {
    streak_threshold: u32,
    success_rate_threshold: Percentage,
}

impl ProgressionRule {
    /// Creates a rule; a missing success-rate threshold defaults to 80%.
    ///
    /// # Errors
    ///
    /// - `OutOfRange` if `streak_threshold` is zero
    pub fn new(
        streak_threshold: u32,
        success_rate_threshold: Option<Percentage>,
    ) -> Result<Self, ValidationError> {
        if streak_threshold == 0 {
            return Err(ValidationError::out_of_range(
                "streak_threshold",
                1,
                i32::MAX,
                0,
            ));
        }
        Ok(Self {
            streak_threshold,
            success_rate_threshold: success_rate_threshold
                .unwrap_or(Percentage::new(DEFAULT_SUCCESS_RATE_THRESHOLD)),
        })
    }

    pub fn streak_threshold(&self) -> u32 {
        self.streak_threshold
    }

    pub fn success_rate_threshold(&self) -> Percentage {
        self.success_rate_threshold
    }

    /// Returns true if the metrics satisfy both thresholds.
    pub fn is_satisfied_by(&self, metrics: &HabitMetrics) -> bool {
        metrics.current_streak >= self.streak_threshold
            && metrics.success_rate >= self.success_rate_threshold
    }
}

impl Default for ProgressionRule {
    fn default() -> Self {
        Self {
            streak_threshold: DEFAULT_STREAK_THRESHOLD,
            success_rate_threshold: Percentage::new(DEFAULT_SUCCESS_RATE_THRESHOLD),
        }
    }
}

/// Per-habit progression state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionState {
    #[default]
    Steady,
    PromotionPending,
}

impl StateMachine for ProgressionState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ProgressionState::*;
        matches!((self, target), (Steady, PromotionPending) | (PromotionPending, Steady))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            ProgressionState::Steady => vec![ProgressionState::PromotionPending],
            ProgressionState::PromotionPending => vec![ProgressionState::Steady],
        }
    }
}

/// What the caller should do after a completion was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum ProgressionDecision {
    /// Thresholds not met (or no higher tier exists); nothing to request.
    Hold,
    /// Thresholds met: request a proposal for `next_tier`.
    ///
    /// `newly_triggered` is false when the habit was already pending, e.g.
    /// because an earlier proposal request failed.
    RequestProposal {
        next_tier: DifficultyTier,
        newly_triggered: bool,
    },
    /// Pending from an earlier completion; thresholds currently unmet.
    AwaitingAcceptance,
}

/// Stateless evaluator for the steady / promotion-pending state machine.
pub struct ProgressionController;

impl ProgressionController {
    /// Evaluates the rule after an update and returns the next state.
    ///
    /// Re-evaluating an already pending habit is harmless: it stays pending
    /// and the proposal is requested again while the thresholds hold.
    pub fn evaluate(
        state: ProgressionState,
        rule: &ProgressionRule,
        metrics: &HabitMetrics,
        difficulty: DifficultyTier,
    ) -> (ProgressionState, ProgressionDecision) {
        let eligible = rule.is_satisfied_by(metrics);

        match (state, difficulty.next()) {
            (ProgressionState::Steady, Some(next_tier)) if eligible => (
                ProgressionState::PromotionPending,
                ProgressionDecision::RequestProposal {
                    next_tier,
                    newly_triggered: true,
                },
            ),
            (ProgressionState::PromotionPending, Some(next_tier)) if eligible => (
                ProgressionState::PromotionPending,
                ProgressionDecision::RequestProposal {
                    next_tier,
                    newly_triggered: false,
                },
            ),
            (ProgressionState::PromotionPending, _) => (
                ProgressionState::PromotionPending,
                ProgressionDecision::AwaitingAcceptance,
            ),
            (ProgressionState::Steady, _) => (ProgressionState::Steady, ProgressionDecision::Hold),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(streak: u32, rate: u8) -> HabitMetrics {
        HabitMetrics {
            current_streak: streak,
            longest_streak: streak,
            success_rate: Percentage::new(rate),
        }
    }

    fn rule(streak: u32, rate: u8) -> ProgressionRule {
        ProgressionRule::new(streak, Some(Percentage::new(rate))).unwrap()
    }

    #[test]
    fn streak_seven_at_eighty_five_percent_triggers() {
        let (state, decision) = ProgressionController::evaluate(
            ProgressionState::Steady,
            &rule(7, 80),
            &metrics(7, 85),
            DifficultyTier::Small,
        );
        assert_eq!(state, ProgressionState::PromotionPending);
        assert_eq!(
            decision,
            ProgressionDecision::RequestProposal {
                next_tier: DifficultyTier::Medium,
                newly_triggered: true
            }
        );
    }

    #[test]
    fn both_thresholds_are_required() {
        for m in [metrics(6, 95), metrics(12, 79)] {
            let (state, decision) = ProgressionController::evaluate(
                ProgressionState::Steady,
                &rule(7, 80),
                &m,
                DifficultyTier::Micro,
            );
            assert_eq!(state, ProgressionState::Steady);
            assert_eq!(decision, ProgressionDecision::Hold);
        }
    }

    #[test]
    fn pending_habit_re_requests_while_eligible() {
        let (state, decision) = ProgressionController::evaluate(
            ProgressionState::PromotionPending,
            &rule(7, 80),
            &metrics(8, 90),
            DifficultyTier::Micro,
        );
        assert_eq!(state, ProgressionState::PromotionPending);
        assert_eq!(
            decision,
            ProgressionDecision::RequestProposal {
                next_tier: DifficultyTier::Small,
                newly_triggered: false
            }
        );
    }

    #[test]
    fn pending_habit_stays_pending_when_metrics_drop() {
        let (state, decision) = ProgressionController::evaluate(
            ProgressionState::PromotionPending,
            &rule(7, 80),
            &metrics(1, 40),
            DifficultyTier::Micro,
        );
        assert_eq!(state, ProgressionState::PromotionPending);
        assert_eq!(decision, ProgressionDecision::AwaitingAcceptance);
    }

    #[test]
    fn top_tier_never_triggers() {
        let (state, decision) = ProgressionController::evaluate(
            ProgressionState::Steady,
            &rule(1, 0),
            &metrics(50, 100),
            DifficultyTier::Challenging,
        );
        assert_eq!(state, ProgressionState::Steady);
        assert_eq!(decision, ProgressionDecision::Hold);
    }

    #[test]
    fn missing_success_threshold_defaults_to_eighty() {
        let rule = ProgressionRule::new(5, None).unwrap();
        assert_eq!(rule.success_rate_threshold(), Percentage::new(80));
    }

    #[test]
    fn zero_streak_threshold_is_rejected() {
        assert!(ProgressionRule::new(0, None).is_err());
    }
}
