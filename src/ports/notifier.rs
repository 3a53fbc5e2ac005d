//! LevelUpNotifier port - outbound level-up notifications.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};

/// A level increase produced by reward translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    pub user: UserId,
    /// The level reached after applying the increase.
    pub new_level: u32,
    /// Cumulative voice minutes at the time of the level-up.
    pub total_minutes: u64,
    /// Credits awarded by the same increment.
    pub credits_awarded: u64,
}

/// Port for delivering level-up notifications to the presentation layer.
///
/// Delivery is best-effort: failures are logged by the caller and never
/// interrupt reward application.
#[async_trait]
pub trait LevelUpNotifier: Send + Sync {
    async fn level_up(&self, event: LevelUp) -> Result<(), DomainError>;
}
