//! PostgreSQL implementation of AccountStore.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::economy::Account;
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::{AccountStore, MinuteIncrement};

/// PostgreSQL implementation of the AccountStore port.
///
/// The conditional decrement and the monotonic counters are single UPDATE
/// statements, so concurrent callers serialize on the row without any
/// application-side locking.
pub struct PostgresAccountStore {
    pool: PgPool,
}

impl PostgresAccountStore {
    /// Creates a new PostgresAccountStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a zeroed row unless one already exists.
    async fn ensure_row(&self, user: UserId) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user.value() as i64)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to create account: {}", e)))?;
        Ok(())
    }
}

/// Database row representation of an account.
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    user_id: i64,
    balance: i64,
    level: i32,
    voice_minutes: i64,
    unlimited: bool,
    created_at: DateTime<Utc>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account {
            user_id: UserId::new(row.user_id as u64),
            balance: row.balance,
            level: row.level as u32,
            voice_minutes: row.voice_minutes as u64,
            unlimited: row.unlimited,
            created_at: Timestamp::from_datetime(row.created_at),
        }
    }
}

#[async_trait]
impl AccountStore for PostgresAccountStore {
    async fn get_or_create(&self, user: UserId) -> Result<Account, DomainError> {
        self.ensure_row(user).await?;

        let row: AccountRow = sqlx::query_as(
            r#"
            SELECT user_id, balance, level, voice_minutes, unlimited, created_at
            FROM accounts
            WHERE user_id = $1
            "#,
        )
        .bind(user.value() as i64)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch account: {}", e)))?
        .ok_or_else(|| {
            DomainError::new(ErrorCode::AccountNotFound, format!("No account for user {}", user))
        })?;

        Ok(row.into())
    }

    async fn add_voice_minutes(
        &self,
        user: UserId,
        minutes: u64,
    ) -> Result<MinuteIncrement, DomainError> {
        self.ensure_row(user).await?;

        let (after,): (i64,) = sqlx::query_as(
            r#"
            UPDATE accounts
            SET voice_minutes = voice_minutes + $2
            WHERE user_id = $1
            RETURNING voice_minutes
            "#,
        )
        .bind(user.value() as i64)
        .bind(minutes as i64)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to add voice minutes: {}", e)))?;

        let after = after as u64;
        Ok(MinuteIncrement { before: after - minutes, after })
    }

    async fn credit(&self, user: UserId, amount: i64) -> Result<(), DomainError> {
        self.ensure_row(user).await?;

        sqlx::query("UPDATE accounts SET balance = balance + $2 WHERE user_id = $1")
            .bind(user.value() as i64)
            .bind(amount)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to credit account: {}", e)))?;

        Ok(())
    }

    async fn try_debit(&self, user: UserId, amount: i64) -> Result<bool, DomainError> {
        self.ensure_row(user).await?;

        // The gate and the spend are one statement; no row matches when the
        // balance is short, and no interleaving can drive it negative.
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET balance = balance - $2
            WHERE user_id = $1 AND balance >= $2
            "#,
        )
        .bind(user.value() as i64)
        .bind(amount)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to debit account: {}", e)))?;

        Ok(result.rows_affected() == 1)
    }

    async fn add_levels(&self, user: UserId, levels: u64) -> Result<u32, DomainError> {
        self.ensure_row(user).await?;

        let (level,): (i32,) = sqlx::query_as(
            r#"
            UPDATE accounts
            SET level = level + $2
            WHERE user_id = $1
            RETURNING level
            "#,
        )
        .bind(user.value() as i64)
        .bind(levels as i64)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to add levels: {}", e)))?;

        Ok(level as u32)
    }

    async fn set_balance(&self, user: UserId, balance: i64) -> Result<(), DomainError> {
        self.ensure_row(user).await?;

        sqlx::query("UPDATE accounts SET balance = $2 WHERE user_id = $1")
            .bind(user.value() as i64)
            .bind(balance)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to set balance: {}", e)))?;

        Ok(())
    }

    async fn set_level(&self, user: UserId, level: u32) -> Result<(), DomainError> {
        self.ensure_row(user).await?;

        sqlx::query("UPDATE accounts SET level = $2 WHERE user_id = $1")
            .bind(user.value() as i64)
            .bind(level as i32)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to set level: {}", e)))?;

        Ok(())
    }

    async fn set_unlimited(&self, user: UserId, unlimited: bool) -> Result<(), DomainError> {
        self.ensure_row(user).await?;

        sqlx::query("UPDATE accounts SET unlimited = $2 WHERE user_id = $1")
            .bind(user.value() as i64)
            .bind(unlimited)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to set unlimited: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_row_converts_to_domain_account() {
        let row = AccountRow {
            user_id: 1355605971858100249,
            balance: 12,
            level: 3,
            voice_minutes: 75,
            unlimited: false,
            created_at: Utc::now(),
        };

        let account: Account = row.into();

        assert_eq!(account.user_id, UserId::new(1355605971858100249));
        assert_eq!(account.balance, 12);
        assert_eq!(account.level, 3);
        assert_eq!(account.voice_minutes, 75);
        assert!(!account.unlimited);
    }
}
