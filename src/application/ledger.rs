//! CreditLedger - balance gating, spending, and refunds.

use std::sync::Arc;

use crate::domain::economy::{ServiceKind, ServicePrice};
use crate::domain::foundation::{DomainError, UserId};
use crate::domain::lookup::AccountStats;
use crate::ports::{AccountStore, PriceStore};

/// Result of an affordability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Affordability {
    /// Unlimited access bypasses pricing entirely.
    Unlimited,
    /// Balance covers the price.
    Affordable { price: i64, balance: i64 },
    /// Balance below price; stats attached for presentation.
    Insufficient { price: i64, stats: AccountStats },
}

impl Affordability {
    pub fn is_ok(&self) -> bool {
        !matches!(self, Affordability::Insufficient { .. })
    }
}

/// Result of a debit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebitOutcome {
    /// Unlimited access: nothing was spent.
    Unlimited,
    /// The price was spent.
    Debited(i64),
    /// The conditional decrement matched no row: balance below price.
    InsufficientFunds { price: i64, stats: AccountStats },
}

/// Balance operations for the credit economy, keyed by user id.
///
/// The gate and the spend are one conditional decrement in the store, so
/// two racing debits by the same user can never drive the balance negative.
pub struct CreditLedger {
    accounts: Arc<dyn AccountStore>,
    prices: Arc<dyn PriceStore>,
}

impl CreditLedger {
    pub fn new(accounts: Arc<dyn AccountStore>, prices: Arc<dyn PriceStore>) -> Self {
        Self { accounts, prices }
    }

    /// Whether the user can pay for one use of `service`.
    pub async fn check_affordability(
        &self,
        user: UserId,
        service: ServiceKind,
    ) -> Result<Affordability, DomainError> {
        let account = self.accounts.get_or_create(user).await?;
        if account.unlimited {
            return Ok(Affordability::Unlimited);
        }

        let price = self.prices.price_of(service).await?;
        if account.can_afford(price) {
            Ok(Affordability::Affordable { price, balance: account.balance })
        } else {
            Ok(Affordability::Insufficient {
                price,
                stats: AccountStats {
                    balance: account.balance,
                    level: account.level,
                    voice_minutes: account.voice_minutes,
                },
            })
        }
    }

    /// Spends the price of one use of `service`, gated atomically.
    pub async fn debit(
        &self,
        user: UserId,
        service: ServiceKind,
    ) -> Result<DebitOutcome, DomainError> {
        let account = self.accounts.get_or_create(user).await?;
        if account.unlimited {
            return Ok(DebitOutcome::Unlimited);
        }

        let price = self.prices.price_of(service).await?;
        if self.accounts.try_debit(user, price).await? {
            tracing::debug!(user = %user, service = %service, price, "Debited lookup charge");
            Ok(DebitOutcome::Debited(price))
        } else {
            let account = self.accounts.get_or_create(user).await?;
            Ok(DebitOutcome::InsufficientFunds {
                price,
                stats: AccountStats {
                    balance: account.balance,
                    level: account.level,
                    voice_minutes: account.voice_minutes,
                },
            })
        }
    }

    /// Unconditionally adds `amount` to the balance.
    pub async fn credit(&self, user: UserId, amount: i64) -> Result<(), DomainError> {
        self.accounts.credit(user, amount).await
    }

    /// Returns a previously debited amount after a failed lookup.
    pub async fn refund(&self, user: UserId, amount: i64) -> Result<(), DomainError> {
        tracing::info!(user = %user, amount, "Refunding failed lookup");
        self.accounts.credit(user, amount).await
    }

    /// Administrative override: sets the balance outright.
    pub async fn set_balance(&self, user: UserId, balance: i64) -> Result<(), DomainError> {
        self.accounts.get_or_create(user).await?;
        self.accounts.set_balance(user, balance).await
    }

    /// Administrative override: sets the level outright.
    pub async fn set_level(&self, user: UserId, level: u32) -> Result<(), DomainError> {
        self.accounts.get_or_create(user).await?;
        self.accounts.set_level(user, level).await
    }

    /// Administrative override: toggles unlimited access.
    pub async fn set_unlimited(&self, user: UserId, unlimited: bool) -> Result<(), DomainError> {
        self.accounts.get_or_create(user).await?;
        self.accounts.set_unlimited(user, unlimited).await
    }

    /// Administrative override: sets one service's price.
    pub async fn set_price(&self, price: ServicePrice) -> Result<(), DomainError> {
        self.prices.set_price(price).await
    }
}
