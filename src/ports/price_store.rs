//! PriceStore port - mutable service pricing configuration.

use async_trait::async_trait;

use crate::domain::economy::{ServiceKind, ServicePrice};
use crate::domain::foundation::DomainError;

/// Port for the service price table.
#[async_trait]
pub trait PriceStore: Send + Sync {
    /// Current price for a service.
    ///
    /// Falls back to the service's built-in default when no row exists.
    async fn price_of(&self, service: ServiceKind) -> Result<i64, DomainError>;

    /// Administrative override for one service's price.
    async fn set_price(&self, price: ServicePrice) -> Result<(), DomainError>;

    /// Seeds the default price table at initialization.
    ///
    /// Existing overrides are left untouched.
    async fn seed_defaults(&self) -> Result<(), DomainError>;
}
