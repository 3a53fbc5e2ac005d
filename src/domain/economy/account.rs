//! Account record - per-user balance, level, and presence totals.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId};

/// Persistent per-user economy record.
///
/// Created lazily with zeroed totals on first reference. Balance is mutated
/// by the ledger; level and voice minutes only ever increase and are driven
/// by the reward translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub user_id: UserId,
    /// Credit balance. Never negative: debits are conditional decrements.
    pub balance: i64,
    /// Monotonic non-decreasing level.
    pub level: u32,
    /// Cumulative reconciled voice minutes, monotonic non-decreasing.
    pub voice_minutes: u64,
    /// Bypasses all balance checks and debits when set.
    pub unlimited: bool,
    pub created_at: Timestamp,
}

impl Account {
    /// Creates a fresh account with zeroed totals.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            balance: 0,
            level: 0,
            voice_minutes: 0,
            unlimited: false,
            created_at: Timestamp::now(),
        }
    }

    /// Whether this account can pay `price`, ignoring the unlimited flag.
    pub fn can_afford(&self, price: i64) -> bool {
        self.balance >= price
    }
}
