//! In-memory recovery plan repository.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::habit::RecoveryPlan;
use crate::ports::RecoveryPlanRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryRecoveryPlanRepository {
    plans: Arc<RwLock<Vec<RecoveryPlan>>>,
}

impl InMemoryRecoveryPlanRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.plans.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.plans.read().await.is_empty()
    }
}

#[async_trait]
impl RecoveryPlanRepository for InMemoryRecoveryPlanRepository {
    async fn save(&self, plan: &RecoveryPlan) -> Result<(), DomainError> {
        self.plans.write().await.push(plan.clone());
        Ok(())
    }

    async fn list_for_owner(&self, owner_id: &UserId) -> Result<Vec<RecoveryPlan>, DomainError> {
        let plans = self.plans.read().await;
        Ok(plans
            .iter()
            .filter(|p| &p.owner_id == owner_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{HabitId, Timestamp};
    use serde_json::json;

    fn plan(owner: &str) -> RecoveryPlan {
        RecoveryPlan::new(
            UserId::new(owner).unwrap(),
            HabitId::new(),
            None,
            json!({"steps": []}),
            Timestamp::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn lists_only_the_owners_plans() {
        let repo = InMemoryRecoveryPlanRepository::new();
        let first = plan("ann");
        repo.save(&first).await.unwrap();
        repo.save(&plan("ben")).await.unwrap();
        let second = plan("ann");
        repo.save(&second).await.unwrap();

        let plans = repo.list_for_owner(&UserId::new("ann").unwrap()).await.unwrap();
        assert_eq!(plans, vec![first, second]);
        assert_eq!(repo.len().await, 3);
    }
}
