use crate::domain::history::{HistoryEntry, NewHistoryEntry};
use crate::domain::point::{UserBalance, UserId};
use crate::domain::ports::{BalanceStore, HistoryLog};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// A thread-safe in-memory store for user balances.
///
/// Uses `Arc<RwLock<HashMap<UserId, UserBalance>>>` so clones share the same map.
#[derive(Default, Clone)]
pub struct InMemoryBalanceStore {
    balances: Arc<RwLock<HashMap<UserId, UserBalance>>>,
}

impl InMemoryBalanceStore {
    /// Creates a new, empty in-memory balance store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BalanceStore for InMemoryBalanceStore {
    async fn get(&self, user_id: UserId) -> Result<Option<UserBalance>> {
        let balances = self.balances.read().await;
        Ok(balances.get(&user_id).cloned())
    }

    async fn upsert(&self, user_id: UserId, point: i64, updated_at: i64) -> Result<UserBalance> {
        let balance = UserBalance::new(user_id, point, updated_at);
        let mut balances = self.balances.write().await;
        balances.insert(user_id, balance.clone());
        Ok(balance)
    }
}

/// A thread-safe in-memory history log.
///
/// Entry ids come from a single atomic counter, so they are unique and
/// increasing across users. Per-user ordering is the append order.
#[derive(Default, Clone)]
pub struct InMemoryHistoryLog {
    entries: Arc<RwLock<HashMap<UserId, Vec<HistoryEntry>>>>,
    next_id: Arc<AtomicU64>,
}

impl InMemoryHistoryLog {
    /// Creates a new, empty in-memory history log.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryLog for InMemoryHistoryLog {
    async fn append(&self, entry: NewHistoryEntry) -> Result<HistoryEntry> {
        let stored = entry.with_id(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let mut entries = self.entries.write().await;
        entries
            .entry(stored.user_id)
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<HistoryEntry>> {
        let entries = self.entries.read().await;
        Ok(entries.get(&user_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::history::TransactionType;

    fn user(id: i64) -> UserId {
        UserId::new(id).unwrap()
    }

    #[tokio::test]
    async fn test_in_memory_balance_store() {
        let store = InMemoryBalanceStore::new();
        let stored = store.upsert(user(1), 100, 5).await.unwrap();
        assert_eq!(stored, UserBalance::new(user(1), 100, 5));

        let retrieved = store.get(user(1)).await.unwrap().unwrap();
        assert_eq!(retrieved, stored);
        assert!(store.get(user(2)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_replaces_point_and_timestamp() {
        let store = InMemoryBalanceStore::new();
        store.upsert(user(1), 100, 5).await.unwrap();
        store.upsert(user(1), 40, 9).await.unwrap();

        let retrieved = store.get(user(1)).await.unwrap().unwrap();
        assert_eq!(retrieved.point, 40);
        assert_eq!(retrieved.updated_at, 9);
    }

    #[tokio::test]
    async fn test_in_memory_history_log() {
        let log = InMemoryHistoryLog::new();
        let entry = |user_id, amount, r#type| NewHistoryEntry {
            user_id,
            amount,
            r#type,
            timestamp: 0,
        };

        let first = log
            .append(entry(user(1), 500, TransactionType::Charge))
            .await
            .unwrap();
        let other = log
            .append(entry(user(2), 10, TransactionType::Charge))
            .await
            .unwrap();
        let second = log
            .append(entry(user(1), -200, TransactionType::Use))
            .await
            .unwrap();

        assert!(first.id < other.id && other.id < second.id);

        let listed = log.list_by_user(user(1)).await.unwrap();
        assert_eq!(listed, vec![first, second]);
        assert!(log.list_by_user(user(3)).await.unwrap().is_empty());
    }
}
