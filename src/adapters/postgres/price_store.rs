//! PostgreSQL implementation of PriceStore.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::economy::{ServiceKind, ServicePrice};
use crate::domain::foundation::DomainError;
use crate::ports::PriceStore;

/// PostgreSQL implementation of the PriceStore port.
pub struct PostgresPriceStore {
    pool: PgPool,
}

impl PostgresPriceStore {
    /// Creates a new PostgresPriceStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PriceStore for PostgresPriceStore {
    async fn price_of(&self, service: ServiceKind) -> Result<i64, DomainError> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT price FROM service_prices WHERE service = $1")
                .bind(service.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database(format!("Failed to fetch price: {}", e)))?;

        Ok(row.map(|(price,)| price).unwrap_or_else(|| service.default_price()))
    }

    async fn set_price(&self, price: ServicePrice) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO service_prices (service, price, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (service) DO UPDATE
            SET price = EXCLUDED.price, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(price.service.as_str())
        .bind(price.price)
        .bind(price.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to set price: {}", e)))?;

        Ok(())
    }

    async fn seed_defaults(&self) -> Result<(), DomainError> {
        for default in ServicePrice::defaults() {
            sqlx::query(
                r#"
                INSERT INTO service_prices (service, price, updated_at)
                VALUES ($1, $2, $3)
                ON CONFLICT (service) DO NOTHING
                "#,
            )
            .bind(default.service.as_str())
            .bind(default.price)
            .bind(default.updated_at.as_datetime())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to seed prices: {}", e)))?;
        }

        Ok(())
    }
}
