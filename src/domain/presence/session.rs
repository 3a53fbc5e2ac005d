//! Open presence session record.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ChannelId, GuildId, Timestamp, UserId};

/// Where a session is taking place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceLocation {
    pub guild: GuildId,
    pub channel: ChannelId,
}

impl VoiceLocation {
    pub fn new(guild: GuildId, channel: ChannelId) -> Self {
        Self { guild, channel }
    }
}

/// One user's currently open voice-channel occupancy.
///
/// Keyed by user id: at most one open session exists per user at any
/// instant. `last_reconciled` only ever advances by the whole-minute amounts
/// a reconciliation tick actually credited, so `started_at..last_reconciled`
/// is always exactly the span already settled into the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceSession {
    pub user_id: UserId,
    pub location: VoiceLocation,
    pub started_at: Timestamp,
    pub last_reconciled: Timestamp,
}

impl PresenceSession {
    /// Opens a session at `now`; nothing has been reconciled yet.
    pub fn open(user_id: UserId, location: VoiceLocation, now: Timestamp) -> Self {
        Self {
            user_id,
            location,
            started_at: now,
            last_reconciled: now,
        }
    }

    /// Whole minutes accrued since the last reconciliation.
    pub fn unreconciled_minutes(&self, now: Timestamp) -> u64 {
        now.whole_minutes_since(&self.last_reconciled)
    }

    /// Whole minutes already settled by reconciliation ticks.
    pub fn reconciled_minutes(&self) -> u64 {
        self.last_reconciled.whole_minutes_since(&self.started_at)
    }

    /// True when no tick has reconciled this session within `threshold_secs`.
    pub fn is_stale(&self, now: Timestamp, threshold_secs: u64) -> bool {
        now.duration_since(&self.last_reconciled).num_seconds() > threshold_secs as i64
    }
}
