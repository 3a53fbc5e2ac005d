//! Scriptable voice-state probe for tests.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::presence::VoiceLocation;
use crate::ports::VoiceStateProbe;

/// `VoiceStateProbe` answering from a scripted per-user table.
///
/// Unknown users read as absent. Users marked with [`Self::fail_for`]
/// produce a gateway error instead of an answer.
#[derive(Default)]
pub struct StaticVoiceProbe {
    present: RwLock<HashMap<UserId, bool>>,
    failing: RwLock<HashSet<UserId>>,
}

impl StaticVoiceProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts whether the user reads as present.
    pub async fn set_present(&self, user: UserId, present: bool) {
        self.present.write().await.insert(user, present);
    }

    /// Scripts a probe failure for the user.
    pub async fn fail_for(&self, user: UserId) {
        self.failing.write().await.insert(user);
    }
}

#[async_trait]
impl VoiceStateProbe for StaticVoiceProbe {
    async fn is_present(
        &self,
        user: UserId,
        _location: &VoiceLocation,
    ) -> Result<bool, DomainError> {
        if self.failing.read().await.contains(&user) {
            return Err(DomainError::new(
                ErrorCode::GatewayError,
                format!("Voice state unavailable for user {}", user),
            ));
        }
        Ok(self.present.read().await.get(&user).copied().unwrap_or(false))
    }
}
