//! In-memory account store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::economy::Account;
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::{AccountStore, MinuteIncrement};

/// `AccountStore` backed by a map guarded with an async lock.
///
/// Every write holds the lock for the whole read-modify-write, so the
/// conditional decrement is atomic here the same way the single UPDATE
/// statement makes it atomic in postgres.
#[derive(Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<HashMap<UserId, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn get_or_create(&self, user: UserId) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.write().await;
        Ok(accounts.entry(user).or_insert_with(|| Account::new(user)).clone())
    }

    async fn add_voice_minutes(
        &self,
        user: UserId,
        minutes: u64,
    ) -> Result<MinuteIncrement, DomainError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.entry(user).or_insert_with(|| Account::new(user));
        let before = account.voice_minutes;
        account.voice_minutes += minutes;
        Ok(MinuteIncrement { before, after: account.voice_minutes })
    }

    async fn credit(&self, user: UserId, amount: i64) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.entry(user).or_insert_with(|| Account::new(user));
        account.balance += amount;
        Ok(())
    }

    async fn try_debit(&self, user: UserId, amount: i64) -> Result<bool, DomainError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.entry(user).or_insert_with(|| Account::new(user));
        if account.balance >= amount {
            account.balance -= amount;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn add_levels(&self, user: UserId, levels: u64) -> Result<u32, DomainError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.entry(user).or_insert_with(|| Account::new(user));
        account.level += levels as u32;
        Ok(account.level)
    }

    async fn set_balance(&self, user: UserId, balance: i64) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.entry(user).or_insert_with(|| Account::new(user));
        account.balance = balance;
        Ok(())
    }

    async fn set_level(&self, user: UserId, level: u32) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.entry(user).or_insert_with(|| Account::new(user));
        account.level = level;
        Ok(())
    }

    async fn set_unlimited(&self, user: UserId, unlimited: bool) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.entry(user).or_insert_with(|| Account::new(user));
        account.unlimited = unlimited;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_reference_creates_a_zeroed_account() {
        let store = InMemoryAccountStore::new();
        let account = store.get_or_create(UserId::new(1)).await.unwrap();
        assert_eq!(account.balance, 0);
        assert_eq!(account.voice_minutes, 0);
        assert!(!account.unlimited);
    }

    #[tokio::test]
    async fn try_debit_refuses_to_go_negative() {
        let store = InMemoryAccountStore::new();
        let user = UserId::new(2);
        store.set_balance(user, 3).await.unwrap();

        assert!(store.try_debit(user, 3).await.unwrap());
        assert!(!store.try_debit(user, 1).await.unwrap());
        assert_eq!(store.get_or_create(user).await.unwrap().balance, 0);
    }

    #[tokio::test]
    async fn add_voice_minutes_reports_before_and_after() {
        let store = InMemoryAccountStore::new();
        let user = UserId::new(3);

        let first = store.add_voice_minutes(user, 7).await.unwrap();
        assert_eq!(first, MinuteIncrement { before: 0, after: 7 });

        let second = store.add_voice_minutes(user, 5).await.unwrap();
        assert_eq!(second, MinuteIncrement { before: 7, after: 12 });
    }

    #[tokio::test]
    async fn add_levels_returns_the_new_level() {
        let store = InMemoryAccountStore::new();
        let user = UserId::new(4);
        assert_eq!(store.add_levels(user, 2).await.unwrap(), 2);
        assert_eq!(store.add_levels(user, 1).await.unwrap(), 3);
    }
}
