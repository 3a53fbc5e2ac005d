//! AccountStore port - persistence for per-user economy records.

use async_trait::async_trait;

use crate::domain::economy::Account;
use crate::domain::foundation::{DomainError, UserId};

/// Result of adding reconciled minutes to an account.
///
/// Carries the cumulative totals before and after the increment so the
/// reward translation can count boundary crossings exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinuteIncrement {
    pub before: u64,
    pub after: u64,
}

/// Port for the per-user account table.
///
/// Accounts are created lazily: every operation that references a missing
/// row behaves as if a zeroed account had just been inserted.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fetches the account, creating a zeroed one if absent.
    async fn get_or_create(&self, user: UserId) -> Result<Account, DomainError>;

    /// Adds reconciled whole minutes, returning the old and new totals.
    async fn add_voice_minutes(
        &self,
        user: UserId,
        minutes: u64,
    ) -> Result<MinuteIncrement, DomainError>;

    /// Unconditionally adds `amount` to the balance.
    async fn credit(&self, user: UserId, amount: i64) -> Result<(), DomainError>;

    /// Conditionally subtracts `amount` from the balance.
    ///
    /// The affordability gate and the spend are a single store operation:
    /// the decrement only applies where `balance >= amount`, and the return
    /// value reports whether a row was affected. Two racing debits can
    /// therefore never drive the balance negative.
    async fn try_debit(&self, user: UserId, amount: i64) -> Result<bool, DomainError>;

    /// Raises the level by `levels`, returning the new level.
    async fn add_levels(&self, user: UserId, levels: u64) -> Result<u32, DomainError>;

    /// Administrative override: sets the balance outright.
    async fn set_balance(&self, user: UserId, balance: i64) -> Result<(), DomainError>;

    /// Administrative override: sets the level outright.
    async fn set_level(&self, user: UserId, level: u32) -> Result<(), DomainError>;

    /// Administrative override: toggles unlimited access.
    async fn set_unlimited(&self, user: UserId, unlimited: bool) -> Result<(), DomainError>;
}
