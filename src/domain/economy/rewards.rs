//! Boundary-counting reward translation.
//!
//! Rewards are derived from the number of floor-division boundaries crossed
//! between the old and new cumulative minute totals, never from "+1 per
//! tick". This makes the translation idempotent and independent of how a
//! span of presence is chunked: one big catch-up increment and many small
//! tick increments award exactly the same totals.

use serde::{Deserialize, Serialize};

/// Whole minutes of presence per credit awarded.
pub const MINUTES_PER_CREDIT: u64 = 10;

/// Whole minutes of presence per level gained.
pub const MINUTES_PER_LEVEL: u64 = 20;

/// Credit and level deltas owed for one cumulative-minute increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardDelta {
    pub credits: u64,
    pub levels: u64,
}

impl RewardDelta {
    /// True when the increment crossed no reward boundary.
    pub fn is_empty(&self) -> bool {
        self.credits == 0 && self.levels == 0
    }
}

/// Computes the rewards owed when cumulative minutes move from `before` to
/// `after`.
///
/// Returns an empty delta when `after <= before`; cumulative minutes are
/// monotonic, so a non-increasing pair means there is nothing to award.
pub fn rewards_between(before: u64, after: u64) -> RewardDelta {
    if after <= before {
        return RewardDelta { credits: 0, levels: 0 };
    }
    RewardDelta {
        credits: after / MINUTES_PER_CREDIT - before / MINUTES_PER_CREDIT,
        levels: after / MINUTES_PER_LEVEL - before / MINUTES_PER_LEVEL,
    }
}
