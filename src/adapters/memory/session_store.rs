//! In-memory presence session store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::domain::presence::{PresenceSession, VoiceLocation};
use crate::ports::SessionStore;

/// `SessionStore` backed by a user-keyed map.
///
/// The map key enforces the one-open-session-per-user invariant the same
/// way the primary key does in postgres.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<UserId, PresenceSession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test helper: shifts a session `secs` into the past, as if it had
    /// been opened and last reconciled that long ago.
    pub async fn age_session(&self, user: UserId, secs: u64) {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(&user) {
            session.started_at = session.started_at.minus_secs(secs);
            session.last_reconciled = session.last_reconciled.minus_secs(secs);
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn open_if_absent(
        &self,
        user: UserId,
        location: VoiceLocation,
        now: Timestamp,
    ) -> Result<bool, DomainError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&user) {
            return Ok(false);
        }
        sessions.insert(user, PresenceSession::open(user, location, now));
        Ok(true)
    }

    async fn find(&self, user: UserId) -> Result<Option<PresenceSession>, DomainError> {
        Ok(self.sessions.read().await.get(&user).cloned())
    }

    async fn list_open(&self) -> Result<Vec<PresenceSession>, DomainError> {
        Ok(self.sessions.read().await.values().cloned().collect())
    }

    async fn advance_reconciled(
        &self,
        user: UserId,
        expected: Timestamp,
        minutes: u64,
    ) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(&user) {
            if session.last_reconciled == expected {
                session.last_reconciled = session.last_reconciled.plus_minutes(minutes);
            }
        }
        Ok(())
    }

    async fn delete(&self, user: UserId) -> Result<Option<PresenceSession>, DomainError> {
        Ok(self.sessions.write().await.remove(&user))
    }

    async fn delete_stale(
        &self,
        now: Timestamp,
        threshold_secs: u64,
    ) -> Result<u64, DomainError> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_stale(now, threshold_secs));
        Ok((before - sessions.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ChannelId, GuildId};

    fn location() -> VoiceLocation {
        VoiceLocation::new(GuildId::new(1), ChannelId::new(2))
    }

    #[tokio::test]
    async fn second_open_for_the_same_user_is_refused() {
        let store = InMemorySessionStore::new();
        let user = UserId::new(1);
        let now = Timestamp::now();

        assert!(store.open_if_absent(user, location(), now).await.unwrap());
        assert!(!store.open_if_absent(user, location(), now).await.unwrap());
        assert_eq!(store.list_open().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_returns_the_removed_session_once() {
        let store = InMemorySessionStore::new();
        let user = UserId::new(2);
        store
            .open_if_absent(user, location(), Timestamp::now())
            .await
            .unwrap();

        assert!(store.delete(user).await.unwrap().is_some());
        assert!(store.delete(user).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn advance_after_delete_is_a_no_op() {
        let store = InMemorySessionStore::new();
        let user = UserId::new(3);
        store
            .advance_reconciled(user, Timestamp::now(), 5)
            .await
            .unwrap();
        assert!(store.find(user).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn advance_with_a_stale_clock_leaves_a_replacement_session_alone() {
        let store = InMemorySessionStore::new();
        let user = UserId::new(6);
        store
            .open_if_absent(user, location(), Timestamp::now())
            .await
            .unwrap();
        store.age_session(user, 120).await;
        let old_clock = store.find(user).await.unwrap().unwrap().last_reconciled;

        // The session ends and a new one opens before the advance lands.
        store.delete(user).await.unwrap();
        store
            .open_if_absent(user, location(), Timestamp::now())
            .await
            .unwrap();
        let fresh = store.find(user).await.unwrap().unwrap();

        store.advance_reconciled(user, old_clock, 5).await.unwrap();

        let after = store.find(user).await.unwrap().unwrap();
        assert_eq!(after.last_reconciled, fresh.last_reconciled);
    }

    #[tokio::test]
    async fn delete_stale_sweeps_only_past_the_threshold() {
        let store = InMemorySessionStore::new();
        let now = Timestamp::now();
        let stale = UserId::new(4);
        let fresh = UserId::new(5);
        store.open_if_absent(stale, location(), now).await.unwrap();
        store.open_if_absent(fresh, location(), now).await.unwrap();
        store.age_session(stale, 400).await;

        let swept = store.delete_stale(Timestamp::now(), 300).await.unwrap();

        assert_eq!(swept, 1);
        assert!(store.find(stale).await.unwrap().is_none());
        assert!(store.find(fresh).await.unwrap().is_some());
    }
}
