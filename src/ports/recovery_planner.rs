//! RecoveryPlanner port - one-way request for a recovery plan.
//!
//! The plan itself arrives out of band and is stored through
//! `RecoveryPlanRepository`.

use async_trait::async_trait;

use crate::domain::foundation::UserId;
use crate::domain::habit::{HabitContext, SetbackEvent};

use super::CollaboratorError;

/// Port for the external planning collaborator.
#[async_trait]
pub trait RecoveryPlanner: Send + Sync {
    /// Sends one request per setback. Delivery is at most once.
    async fn request_plan(
        &self,
        owner_id: &UserId,
        setback: &SetbackEvent,
        habit: &HabitContext,
    ) -> Result<(), CollaboratorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time check that trait is object-safe
    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn RecoveryPlanner) {}
}
