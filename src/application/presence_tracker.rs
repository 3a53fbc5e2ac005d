//! PresenceTracker - converts continuous voice presence into reconciled
//! minutes.
//!
//! Two independent drivers race on the session table: the gateway event
//! path (start/end/move) and the periodic reconciliation tick. The design
//! stays race-safe without locks by two rules:
//!
//! 1. Session deletion is the terminal, idempotent action. Whichever path
//!    deletes first wins; the loser observes an absent row and does nothing.
//! 2. Only the tick path credits minutes, and `last_reconciled` advances by
//!    exactly the whole-minute count credited. The span
//!    `started_at..last_reconciled` is therefore always fully settled, and
//!    the end path has no residue to apply - sub-minute time past the last
//!    tick is untrusted and dropped.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::domain::presence::VoiceLocation;
use crate::ports::{SessionStore, VoiceStateProbe};

use super::rewards::RewardService;

/// Default staleness threshold for abandoned sessions, in seconds.
pub const DEFAULT_STALE_AFTER_SECS: u64 = 300;

/// Outcome of one reconciliation pass over all open sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Open sessions examined.
    pub sessions_seen: u64,
    /// Whole minutes credited across all sessions.
    pub minutes_credited: u64,
    /// Sessions ended because the user was no longer present.
    pub sessions_ended: u64,
}

/// Tracks open presence sessions and reconciles them into minutes.
pub struct PresenceTracker {
    sessions: Arc<dyn SessionStore>,
    probe: Arc<dyn VoiceStateProbe>,
    rewards: Arc<RewardService>,
    stale_after_secs: u64,
}

impl PresenceTracker {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        probe: Arc<dyn VoiceStateProbe>,
        rewards: Arc<RewardService>,
    ) -> Self {
        Self {
            sessions,
            probe,
            rewards,
            stale_after_secs: DEFAULT_STALE_AFTER_SECS,
        }
    }

    /// Overrides the staleness threshold used by [`Self::sweep_stale`].
    pub fn with_stale_after_secs(mut self, secs: u64) -> Self {
        self.stale_after_secs = secs;
        self
    }

    /// Handles a presence-start event.
    ///
    /// A duplicate start while a session is already open is a no-op; the
    /// existing session wins.
    pub async fn on_presence_start(
        &self,
        user: UserId,
        location: VoiceLocation,
    ) -> Result<(), DomainError> {
        let opened = self
            .sessions
            .open_if_absent(user, location, Timestamp::now())
            .await?;
        if opened {
            tracing::debug!(user = %user, channel = %location.channel, "Presence session started");
        }
        Ok(())
    }

    /// Handles a presence-end event.
    ///
    /// Deletes the session and returns the whole minutes it had settled, or
    /// `None` if a racing tick or sweep already removed it. Everything up
    /// to `last_reconciled` was credited by prior ticks; ending applies
    /// nothing further, so no minute interval can be counted twice.
    pub async fn on_presence_end(&self, user: UserId) -> Result<Option<u64>, DomainError> {
        let Some(session) = self.sessions.delete(user).await? else {
            return Ok(None);
        };
        let settled = session.reconciled_minutes();
        tracing::debug!(user = %user, settled_minutes = settled, "Presence session ended");
        Ok(Some(settled))
    }

    /// Handles a move between voice channels: end, then start fresh.
    pub async fn on_presence_move(
        &self,
        user: UserId,
        new_location: VoiceLocation,
    ) -> Result<(), DomainError> {
        self.on_presence_end(user).await?;
        self.on_presence_start(user, new_location).await
    }

    /// One reconciliation pass over every open session.
    ///
    /// Per-session failures (probe or store) end that session without
    /// further credit and never abort the pass; only a failure to list the
    /// open sessions is returned to the caller.
    pub async fn reconcile_tick(&self) -> Result<TickSummary, DomainError> {
        let open = self.sessions.list_open().await?;
        let mut summary = TickSummary::default();

        for session in open {
            summary.sessions_seen += 1;
            let user = session.user_id;

            let present = match self.probe.is_present(user, &session.location).await {
                Ok(present) => present,
                Err(e) => {
                    tracing::warn!(user = %user, error = %e, "Presence probe failed; ending session");
                    false
                }
            };

            if !present {
                match self.sessions.delete(user).await {
                    Ok(Some(_)) => {
                        summary.sessions_ended += 1;
                        tracing::debug!(user = %user, "User no longer present; session ended");
                    }
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!(user = %user, error = %e, "Failed to end absent user's session");
                    }
                }
                continue;
            }

            let elapsed = session.unreconciled_minutes(Timestamp::now());
            if elapsed == 0 {
                continue;
            }

            if let Err(e) = self.rewards.apply_minutes(user, elapsed).await {
                tracing::warn!(user = %user, error = %e, "Reward application failed; will retry next tick");
                continue;
            }
            summary.minutes_credited += elapsed;
            // Advance only by the amount actually credited; the sub-minute
            // remainder stays pending for the next tick. The expected clock
            // keeps the advance off any replacement session a racing move
            // opened in the meantime.
            if let Err(e) = self
                .sessions
                .advance_reconciled(user, session.last_reconciled, elapsed)
                .await
            {
                // The rewards already landed; a session left behind would
                // re-credit the same interval on the next tick.
                tracing::warn!(user = %user, error = %e, "Failed to advance reconciliation clock; ending session");
                match self.sessions.delete(user).await {
                    Ok(Some(_)) => summary.sessions_ended += 1,
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!(user = %user, error = %e, "Failed to end session after advance failure");
                    }
                }
            }
        }

        Ok(summary)
    }

    /// Deletes sessions with no reconciliation inside the staleness window.
    ///
    /// Minutes already reconciled by prior ticks are retained; only the
    /// abandoned tail earns nothing further.
    pub async fn sweep_stale(&self) -> Result<u64, DomainError> {
        let swept = self
            .sessions
            .delete_stale(Timestamp::now(), self.stale_after_secs)
            .await?;
        if swept > 0 {
            tracing::info!(swept, "Swept stale presence sessions");
        }
        Ok(swept)
    }
}
