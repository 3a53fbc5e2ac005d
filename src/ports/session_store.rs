//! SessionStore port - persistence for open presence sessions.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::domain::presence::{PresenceSession, VoiceLocation};

/// Port for the open-session table (one row per user at most).
///
/// Owned exclusively by the presence tracker; no other component writes
/// sessions. Deletion is the terminal, idempotent action both the event
/// path and the polling path can race on safely: whichever runs first wins
/// and the loser observes an absent row.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Opens a session unless one is already open for the user.
    ///
    /// Returns `true` when a new session was created; `false` means an open
    /// session already existed and wins (duplicate start events are no-ops).
    async fn open_if_absent(
        &self,
        user: UserId,
        location: VoiceLocation,
        now: Timestamp,
    ) -> Result<bool, DomainError>;

    /// Fetches the user's open session, if any.
    async fn find(&self, user: UserId) -> Result<Option<PresenceSession>, DomainError>;

    /// Lists every open session, for the reconciliation tick.
    async fn list_open(&self) -> Result<Vec<PresenceSession>, DomainError>;

    /// Advances `last_reconciled` by exactly `minutes` whole minutes,
    /// provided the clock still reads `expected`.
    ///
    /// A no-op when the session has been deleted or replaced in the
    /// meantime: a fresh session opened by a racing move must not have its
    /// clock pushed into the future.
    async fn advance_reconciled(
        &self,
        user: UserId,
        expected: Timestamp,
        minutes: u64,
    ) -> Result<(), DomainError>;

    /// Deletes the session, returning the deleted row if one existed.
    async fn delete(&self, user: UserId) -> Result<Option<PresenceSession>, DomainError>;

    /// Deletes every session whose `last_reconciled` is older than
    /// `threshold_secs`, returning how many were swept.
    async fn delete_stale(&self, now: Timestamp, threshold_secs: u64)
        -> Result<u64, DomainError>;
}
