//! Recovery plan received from the planning collaborator.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::foundation::{HabitId, RecoveryPlanId, SetbackId, Timestamp, UserId, ValidationError};

/// Opaque plan body plus the identifiers needed to show it to its owner.
///
/// The engine stores plans but never interprets or modifies the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryPlan {
    pub id: RecoveryPlanId,
    pub owner_id: UserId,
    pub habit_id: HabitId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setback_id: Option<SetbackId>,
    pub body: JsonValue,
    pub received_at: Timestamp,
}

impl RecoveryPlan {
    /// # Errors
    ///
    /// - `EmptyField` if the body is `null`
    pub fn new(
        owner_id: UserId,
        habit_id: HabitId,
        setback_id: Option<SetbackId>,
        body: JsonValue,
        received_at: Timestamp,
    ) -> Result<Self, ValidationError> {
        if body.is_null() {
            return Err(ValidationError::empty_field("body"));
        }
        Ok(Self {
            id: RecoveryPlanId::new(),
            owner_id,
            habit_id,
            setback_id,
            body,
            received_at,
        })
    }
}
