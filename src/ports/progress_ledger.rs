//! ProgressLedger port - receives XP awards.

use async_trait::async_trait;

use crate::domain::foundation::UserId;

use super::CollaboratorError;

#[async_trait]
pub trait ProgressLedger: Send + Sync {
    /// Records `xp` for the owner under `event_type` (e.g. `habit_completion`).
    async fn award(&self, owner_id: &UserId, event_type: &str, xp: u32) -> Result<(), CollaboratorError>;
}
