//! PostgreSQL implementation of SessionStore.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{ChannelId, DomainError, GuildId, Timestamp, UserId};
use crate::domain::presence::{PresenceSession, VoiceLocation};
use crate::ports::SessionStore;

/// PostgreSQL implementation of the SessionStore port.
///
/// `user_id` is the primary key, which enforces the one-open-session
/// invariant at the store level: a racing duplicate insert conflicts and
/// is dropped, and DELETE returns the row to exactly one caller.
pub struct PostgresSessionStore {
    pool: PgPool,
}

impl PostgresSessionStore {
    /// Creates a new PostgresSessionStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of an open session.
#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    user_id: i64,
    guild_id: i64,
    channel_id: i64,
    started_at: DateTime<Utc>,
    last_reconciled: DateTime<Utc>,
}

impl From<SessionRow> for PresenceSession {
    fn from(row: SessionRow) -> Self {
        PresenceSession {
            user_id: UserId::new(row.user_id as u64),
            location: VoiceLocation::new(
                GuildId::new(row.guild_id as u64),
                ChannelId::new(row.channel_id as u64),
            ),
            started_at: Timestamp::from_datetime(row.started_at),
            last_reconciled: Timestamp::from_datetime(row.last_reconciled),
        }
    }
}

#[async_trait]
impl SessionStore for PostgresSessionStore {
    async fn open_if_absent(
        &self,
        user: UserId,
        location: VoiceLocation,
        now: Timestamp,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO voice_sessions (user_id, guild_id, channel_id, started_at, last_reconciled)
            VALUES ($1, $2, $3, $4, $4)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user.value() as i64)
        .bind(location.guild.value() as i64)
        .bind(location.channel.value() as i64)
        .bind(now.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to open session: {}", e)))?;

        Ok(result.rows_affected() == 1)
    }

    async fn find(&self, user: UserId) -> Result<Option<PresenceSession>, DomainError> {
        let row: Option<SessionRow> = sqlx::query_as(
            r#"
            SELECT user_id, guild_id, channel_id, started_at, last_reconciled
            FROM voice_sessions
            WHERE user_id = $1
            "#,
        )
        .bind(user.value() as i64)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to find session: {}", e)))?;

        Ok(row.map(PresenceSession::from))
    }

    async fn list_open(&self) -> Result<Vec<PresenceSession>, DomainError> {
        let rows: Vec<SessionRow> = sqlx::query_as(
            r#"
            SELECT user_id, guild_id, channel_id, started_at, last_reconciled
            FROM voice_sessions
            ORDER BY started_at
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list sessions: {}", e)))?;

        Ok(rows.into_iter().map(PresenceSession::from).collect())
    }

    async fn advance_reconciled(
        &self,
        user: UserId,
        expected: Timestamp,
        minutes: u64,
    ) -> Result<(), DomainError> {
        // The clock predicate makes this a no-op when a racing end or sweep
        // removed the row, or a move replaced it with a fresh session.
        sqlx::query(
            r#"
            UPDATE voice_sessions
            SET last_reconciled = last_reconciled + ($2 * interval '1 minute')
            WHERE user_id = $1 AND last_reconciled = $3
            "#,
        )
        .bind(user.value() as i64)
        .bind(minutes as i64)
        .bind(expected.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to advance session: {}", e)))?;

        Ok(())
    }

    async fn delete(&self, user: UserId) -> Result<Option<PresenceSession>, DomainError> {
        let row: Option<SessionRow> = sqlx::query_as(
            r#"
            DELETE FROM voice_sessions
            WHERE user_id = $1
            RETURNING user_id, guild_id, channel_id, started_at, last_reconciled
            "#,
        )
        .bind(user.value() as i64)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to delete session: {}", e)))?;

        Ok(row.map(PresenceSession::from))
    }

    async fn delete_stale(
        &self,
        now: Timestamp,
        threshold_secs: u64,
    ) -> Result<u64, DomainError> {
        let cutoff = now.minus_secs(threshold_secs);

        let result = sqlx::query("DELETE FROM voice_sessions WHERE last_reconciled < $1")
            .bind(cutoff.as_datetime())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to sweep sessions: {}", e)))?;

        Ok(result.rows_affected())
    }
}
