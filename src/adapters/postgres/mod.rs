//! PostgreSQL adapters - durable implementations of the store ports.
//!
//! Snowflake ids are stored as BIGINT; they fit in the signed range and
//! round-trip through the `as` casts in the row conversions.

mod account_store;
mod price_store;
mod session_store;

pub use account_store::PostgresAccountStore;
pub use price_store::PostgresPriceStore;
pub use session_store::PostgresSessionStore;

use sqlx::PgPool;

use crate::domain::foundation::DomainError;

/// Applies the embedded migrations to the given pool.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DomainError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to run migrations: {}", e)))
}
