//! RecoveryPlanRepository port - storage for received recovery plans.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::habit::RecoveryPlan;

/// Write-once storage of recovery plans, listable per owner.
#[async_trait]
pub trait RecoveryPlanRepository: Send + Sync {
    /// Stores a plan.
    ///
    /// # Errors
    ///
    /// - `PersistenceFailure` on storage failure
    async fn save(&self, plan: &RecoveryPlan) -> Result<(), DomainError>;

    /// Lists the owner's plans, oldest first.
    async fn list_for_owner(&self, owner_id: &UserId) -> Result<Vec<RecoveryPlan>, DomainError>;
}
