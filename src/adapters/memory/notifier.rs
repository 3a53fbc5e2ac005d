//! Recording level-up notifier for tests.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, UserId};
use crate::ports::{LevelUp, LevelUpNotifier};

/// `LevelUpNotifier` that records every delivered event.
#[derive(Default)]
pub struct RecordingNotifier {
    events: RwLock<Vec<LevelUp>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far, in order.
    pub async fn events(&self) -> Vec<LevelUp> {
        self.events.read().await.clone()
    }

    /// Events delivered for one user.
    pub async fn events_for(&self, user: UserId) -> Vec<LevelUp> {
        self.events
            .read()
            .await
            .iter()
            .filter(|event| event.user == user)
            .copied()
            .collect()
    }
}

#[async_trait]
impl LevelUpNotifier for RecordingNotifier {
    async fn level_up(&self, event: LevelUp) -> Result<(), DomainError> {
        self.events.write().await.push(event);
        Ok(())
    }
}
