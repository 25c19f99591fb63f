//! Habit aggregate entity.
//!
//! A habit is one recurring behavioral commitment owned by exactly one user.
//! It owns its append-only completion history; the rolling metrics and the
//! repetition count are derived from that history.
//!
//! # Purity
//!
//! Every mutation takes `&self` and returns a new `Habit`. Persisting the
//! result is left to the session and the store adapter.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{HabitId, StateMachine, Timestamp, UserId, ValidationError};

use super::{
    Cadence, DifficultyTier, HabitCompletion, HabitError, HabitMetrics, HabitStatus,
    ProgressionController, ProgressionDecision, ProgressionRule, ProgressionState,
    StreakCalculator,
};

/// Maximum length for habit title.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length for habit description.
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

/// User-supplied definition of a new habit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitDefinition {
    pub title: String,
    pub description: Option<String>,
    pub cadence: Cadence,
    pub difficulty: DifficultyTier,
    pub progression_rule: ProgressionRule,
}

impl HabitDefinition {
    /// Definition with default difficulty and progression rule.
    pub fn new(title: impl Into<String>, cadence: Cadence) -> Self {
        Self {
            title: title.into(),
            description: None,
            cadence,
            difficulty: DifficultyTier::default(),
            progression_rule: ProgressionRule::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_difficulty(mut self, difficulty: DifficultyTier) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_progression_rule(mut self, rule: ProgressionRule) -> Self {
        self.progression_rule = rule;
        self
    }
}

/// Partial edit of a habit definition. `None` leaves a field unchanged.
///
/// `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitEdit {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub cadence: Option<Cadence>,
    pub progression_rule: Option<ProgressionRule>,
}

impl HabitEdit {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.cadence.is_none()
            && self.progression_rule.is_none()
    }
}

/// Next-level variant proposed by the coaching advisor and accepted by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionVariant {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Result of applying a completion: the new habit plus the progression outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedCompletion {
    pub habit: Habit,
    pub decision: ProgressionDecision,
}

/// Persisted habit record without its completion history.
///
/// This is the document the store writes; the history is stored separately
/// and appended one completion at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitSnapshot {
    pub id: HabitId,
    pub owner_id: UserId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub cadence: Cadence,
    pub difficulty: DifficultyTier,
    pub status: HabitStatus,
    pub progression_rule: ProgressionRule,
    #[serde(default)]
    pub progression_state: ProgressionState,
    pub metrics: HabitMetrics,
    /// Number of completions `metrics` and `progression_state` account for.
    pub repetitions: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Snapshot of a habit sent to external collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitContext {
    pub habit_id: HabitId,
    pub title: String,
    pub cadence: Cadence,
    pub difficulty: DifficultyTier,
    pub status: HabitStatus,
    pub progression_state: ProgressionState,
    pub repetitions: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub success_rate: u8,
    pub last_completed_at: Option<Timestamp>,
}

/// Habit aggregate.
///
/// # Invariants
///
/// - `title` is 1-200 characters, non-empty
/// - `metrics.longest_streak >= metrics.current_streak`
/// - `repetitions() == completions.len()`
/// - `completions` is ordered by `completed_at`
/// - Retired habits cannot be modified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Habit {
    id: HabitId,
    owner_id: UserId,
    title: String,
    description: Option<String>,
    cadence: Cadence,
    difficulty: DifficultyTier,
    status: HabitStatus,
    progression_rule: ProgressionRule,
    progression_state: ProgressionState,
    metrics: HabitMetrics,
    completions: Vec<HabitCompletion>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Habit {
    /// Creates a new active habit with empty history.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if title or description is invalid
    pub fn new(owner_id: UserId, definition: HabitDefinition, now: Timestamp) -> Result<Self, HabitError> {
        let title = validate_title(&definition.title)?;
        let description = normalize_description(definition.description)?;

        Ok(Self {
            id: HabitId::new(),
            owner_id,
            title,
            description,
            cadence: definition.cadence,
            difficulty: definition.difficulty,
            status: HabitStatus::Active,
            progression_rule: definition.progression_rule,
            progression_state: ProgressionState::Steady,
            metrics: HabitMetrics::default(),
            completions: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuilds a habit from its stored record and history.
    ///
    /// Completions appended after the record was last written are replayed
    /// onto the stored metrics and progression state, each evaluated at its
    /// own completion instant.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the record breaks the streak invariant, the
    ///   history is not in chronological order, or the record counts more
    ///   completions than the history holds
    pub fn reconstitute(
        snapshot: HabitSnapshot,
        completions: Vec<HabitCompletion>,
    ) -> Result<Self, HabitError> {
        if snapshot.metrics.longest_streak < snapshot.metrics.current_streak {
            return Err(HabitError::validation(
                "metrics",
                "longest streak is shorter than current streak",
            ));
        }
        let ordered = completions
            .windows(2)
            .all(|pair| !pair[1].completed_at().is_before(pair[0].completed_at()));
        if !ordered {
            return Err(HabitError::validation(
                "completions",
                "history is not in chronological order",
            ));
        }
        let covered = usize::try_from(snapshot.repetitions).unwrap_or(usize::MAX);
        if covered > completions.len() {
            return Err(HabitError::validation(
                "repetitions",
                "record counts more completions than the history holds",
            ));
        }

        let mut metrics = snapshot.metrics;
        let mut progression_state = snapshot.progression_state;
        let mut updated_at = snapshot.updated_at;
        for end in covered + 1..=completions.len() {
            let at = *completions[end - 1].completed_at();
            metrics = StreakCalculator::apply(metrics, &completions[..end], snapshot.cadence, &at);
            progression_state = ProgressionController::evaluate(
                progression_state,
                &snapshot.progression_rule,
                &metrics,
                snapshot.difficulty,
            )
            .0;
            if updated_at.is_before(&at) {
                updated_at = at;
            }
        }

        Ok(Self {
            id: snapshot.id,
            owner_id: snapshot.owner_id,
            title: snapshot.title,
            description: snapshot.description,
            cadence: snapshot.cadence,
            difficulty: snapshot.difficulty,
            status: snapshot.status,
            progression_rule: snapshot.progression_rule,
            progression_state,
            metrics,
            completions,
            created_at: snapshot.created_at,
            updated_at,
        })
    }

    /// Returns the record part of this habit for persistence.
    pub fn snapshot(&self) -> HabitSnapshot {
        HabitSnapshot {
            id: self.id,
            owner_id: self.owner_id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            cadence: self.cadence,
            difficulty: self.difficulty,
            status: self.status,
            progression_rule: self.progression_rule,
            progression_state: self.progression_state,
            metrics: self.metrics,
            repetitions: self.repetitions(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Returns the serializable context sent to collaborators.
    pub fn context(&self) -> HabitContext {
        HabitContext {
            habit_id: self.id,
            title: self.title.clone(),
            cadence: self.cadence,
            difficulty: self.difficulty,
            status: self.status,
            progression_state: self.progression_state,
            repetitions: self.repetitions(),
            current_streak: self.metrics.current_streak,
            longest_streak: self.metrics.longest_streak,
            success_rate: self.metrics.success_rate.value(),
            last_completed_at: self.last_completion().map(|c| *c.completed_at()),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &HabitId {
        &self.id
    }

    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    pub fn difficulty(&self) -> DifficultyTier {
        self.difficulty
    }

    pub fn status(&self) -> HabitStatus {
        self.status
    }

    pub fn progression_rule(&self) -> &ProgressionRule {
        &self.progression_rule
    }

    pub fn progression_state(&self) -> ProgressionState {
        self.progression_state
    }

    pub fn metrics(&self) -> &HabitMetrics {
        &self.metrics
    }

    pub fn completions(&self) -> &[HabitCompletion] {
        &self.completions
    }

    /// Total repetitions, derived from the history length.
    pub fn repetitions(&self) -> u32 {
        u32::try_from(self.completions.len()).unwrap_or(u32::MAX)
    }

    pub fn last_completion(&self) -> Option<&HabitCompletion> {
        self.completions.last()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Returns true when a pattern analysis is due after the latest completion.
    ///
    /// Evaluated by the caller after every applied completion; an interval
    /// of zero disables the trigger.
    pub fn is_analysis_due(&self, every: u32) -> bool {
        let repetitions = self.repetitions();
        every > 0 && repetitions > 0 && repetitions % every == 0
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Authorization
    // ─────────────────────────────────────────────────────────────────────────

    pub fn is_owner(&self, user_id: &UserId) -> bool {
        &self.owner_id == user_id
    }

    /// # Errors
    ///
    /// - `Forbidden` if user is not the owner
    pub fn authorize(&self, user_id: &UserId) -> Result<(), HabitError> {
        if self.is_owner(user_id) {
            Ok(())
        } else {
            Err(HabitError::Forbidden)
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────────

    /// Applies one completion and returns the resulting habit.
    ///
    /// Recomputes streak and success rate, then evaluates progression.
    /// `self` is left untouched.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the habit is paused or retired
    /// - `OutOfOrderCompletion` if the completion predates the last one
    pub fn apply_completion(
        &self,
        completion: HabitCompletion,
        now: &Timestamp,
    ) -> Result<AppliedCompletion, HabitError> {
        if !self.status.accepts_completions() {
            return Err(HabitError::invalid_state(format!(
                "cannot record completion for {} habit",
                self.status
            )));
        }
        if let Some(last) = self.last_completion() {
            if completion.completed_at().is_before(last.completed_at()) {
                return Err(HabitError::OutOfOrderCompletion);
            }
        }

        let mut next = self.clone();
        next.completions.push(completion);
        next.metrics = StreakCalculator::apply(self.metrics, &next.completions, self.cadence, now);

        let (state, decision) = ProgressionController::evaluate(
            self.progression_state,
            &self.progression_rule,
            &next.metrics,
            self.difficulty,
        );
        next.progression_state = state;
        next.updated_at = *now;

        Ok(AppliedCompletion {
            habit: next,
            decision,
        })
    }

    /// Moves a pending habit to the next difficulty tier.
    ///
    /// Counters are kept. The accepted variant may replace title and
    /// description.
    ///
    /// # Errors
    ///
    /// - `Retired` if the habit is retired
    /// - `InvalidState` if no promotion is pending
    /// - `ValidationFailed` if the variant title is invalid
    pub fn accept_promotion(
        &self,
        variant: Option<ProgressionVariant>,
        now: &Timestamp,
    ) -> Result<Habit, HabitError> {
        self.ensure_mutable()?;
        let state = self
            .progression_state
            .transition_to(ProgressionState::Steady)
            .map_err(|_| HabitError::invalid_state("no promotion is pending"))?;
        let next_tier = self
            .difficulty
            .next()
            .ok_or_else(|| HabitError::invalid_state("habit is already at the top tier"))?;

        let mut next = self.clone();
        if let Some(variant) = variant {
            if let Some(title) = variant.title {
                next.title = validate_title(&title)?;
            }
            if variant.description.is_some() {
                next.description = normalize_description(variant.description)?;
            }
        }
        next.difficulty = next_tier;
        next.progression_state = state;
        next.updated_at = *now;
        Ok(next)
    }

    /// Changes the lifecycle status (pause, resume, retire).
    ///
    /// # Errors
    ///
    /// - `Retired` if the habit is already retired
    /// - `InvalidState` if the transition is not allowed
    pub fn change_status(&self, target: HabitStatus, now: &Timestamp) -> Result<Habit, HabitError> {
        self.ensure_mutable()?;
        let status = self.status.transition_to(target).map_err(|_| {
            HabitError::invalid_state(format!("cannot move habit from {} to {}", self.status, target))
        })?;

        let mut next = self.clone();
        next.status = status;
        next.updated_at = *now;
        Ok(next)
    }

    /// Applies a definition edit.
    ///
    /// Counters and history are not recomputed; they only change in
    /// response to completions.
    ///
    /// # Errors
    ///
    /// - `Retired` if the habit is retired
    /// - `ValidationFailed` if title or description is invalid
    pub fn update_definition(&self, edit: HabitEdit, now: &Timestamp) -> Result<Habit, HabitError> {
        self.ensure_mutable()?;

        let mut next = self.clone();
        if let Some(title) = edit.title {
            next.title = validate_title(&title)?;
        }
        if let Some(description) = edit.description {
            next.description = normalize_description(description)?;
        }
        if let Some(cadence) = edit.cadence {
            next.cadence = cadence;
        }
        if let Some(rule) = edit.progression_rule {
            next.progression_rule = rule;
        }
        next.updated_at = *now;
        Ok(next)
    }

    fn ensure_mutable(&self) -> Result<(), HabitError> {
        if self.status.is_mutable() {
            Ok(())
        } else {
            Err(HabitError::Retired)
        }
    }
}

fn validate_title(title: &str) -> Result<String, ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field("title"));
    }
    let len = trimmed.chars().count();
    if len > MAX_TITLE_LENGTH {
        return Err(ValidationError::out_of_range(
            "title",
            1,
            MAX_TITLE_LENGTH as i32,
            len as i32,
        ));
    }
    Ok(trimmed.to_string())
}

fn normalize_description(description: Option<String>) -> Result<Option<String>, ValidationError> {
    let description = description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());
    if let Some(text) = &description {
        let len = text.chars().count();
        if len > MAX_DESCRIPTION_LENGTH {
            return Err(ValidationError::out_of_range(
                "description",
                0,
                MAX_DESCRIPTION_LENGTH as i32,
                len as i32,
            ));
        }
    }
    Ok(description)
}
