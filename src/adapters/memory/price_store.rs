//! In-memory service price store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::economy::{ServiceKind, ServicePrice};
use crate::domain::foundation::DomainError;
use crate::ports::PriceStore;

/// `PriceStore` backed by a service-keyed map.
#[derive(Default)]
pub struct InMemoryPriceStore {
    prices: RwLock<HashMap<ServiceKind, i64>>,
}

impl InMemoryPriceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PriceStore for InMemoryPriceStore {
    async fn price_of(&self, service: ServiceKind) -> Result<i64, DomainError> {
        let prices = self.prices.read().await;
        Ok(prices.get(&service).copied().unwrap_or_else(|| service.default_price()))
    }

    async fn set_price(&self, price: ServicePrice) -> Result<(), DomainError> {
        self.prices.write().await.insert(price.service, price.price);
        Ok(())
    }

    async fn seed_defaults(&self) -> Result<(), DomainError> {
        let mut prices = self.prices.write().await;
        for default in ServicePrice::defaults() {
            prices.entry(default.service).or_insert(default.price);
        }
        Ok(())
    }
}
