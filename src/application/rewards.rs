//! RewardService - applies a reconciled minute increment to an account.

use std::sync::Arc;

use crate::domain::economy::{rewards_between, RewardDelta};
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::{AccountStore, LevelUp, LevelUpNotifier};

/// Translates a minute increment into credit and level changes.
///
/// The store reports the cumulative totals before and after the increment;
/// the boundary-counting translation derives the deltas from that pair, so
/// one big catch-up and many small ticks award identical totals.
pub struct RewardService {
    accounts: Arc<dyn AccountStore>,
    notifier: Arc<dyn LevelUpNotifier>,
}

impl RewardService {
    pub fn new(accounts: Arc<dyn AccountStore>, notifier: Arc<dyn LevelUpNotifier>) -> Self {
        Self { accounts, notifier }
    }

    /// Records `minutes` of reconciled presence and applies the rewards
    /// crossed by the increment.
    ///
    /// Level-up notification delivery is best-effort; a delivery failure is
    /// logged and never rolls back the applied rewards.
    pub async fn apply_minutes(
        &self,
        user: UserId,
        minutes: u64,
    ) -> Result<RewardDelta, DomainError> {
        if minutes == 0 {
            return Ok(RewardDelta { credits: 0, levels: 0 });
        }

        let increment = self.accounts.add_voice_minutes(user, minutes).await?;
        let delta = rewards_between(increment.before, increment.after);

        if delta.credits > 0 {
            self.accounts.credit(user, delta.credits as i64).await?;
        }

        if delta.levels > 0 {
            let new_level = self.accounts.add_levels(user, delta.levels).await?;
            tracing::info!(
                user = %user,
                new_level,
                total_minutes = increment.after,
                "Level up"
            );
            let event = LevelUp {
                user,
                new_level,
                total_minutes: increment.after,
                credits_awarded: delta.credits,
            };
            if let Err(e) = self.notifier.level_up(event).await {
                tracing::warn!(user = %user, error = %e, "Failed to deliver level-up notification");
            }
        }

        Ok(delta)
    }
}
