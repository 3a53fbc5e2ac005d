//! VoiceStateProbe port - live presence cross-check.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::presence::VoiceLocation;

/// Port for checking a user's live voice state against the gateway.
///
/// The reconciliation tick trusts the store's open sessions only after
/// confirming the user is still actually connected to the tracked channel;
/// a user who left while an event was dropped must not keep accruing.
#[async_trait]
pub trait VoiceStateProbe: Send + Sync {
    /// True when the user is currently connected to exactly this channel.
    async fn is_present(
        &self,
        user: UserId,
        location: &VoiceLocation,
    ) -> Result<bool, DomainError>;
}
