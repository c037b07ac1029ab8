use super::history::{HistoryEntry, NewHistoryEntry};
use super::point::{UserBalance, UserId};
use crate::error::Result;
use async_trait::async_trait;

/// Current balance per user.
///
/// Implementations need no cross-user atomicity: one lane at a time writes
/// a given user's entry.
#[async_trait]
pub trait BalanceStore: Send + Sync {
    async fn get(&self, user_id: UserId) -> Result<Option<UserBalance>>;
    /// Replaces the stored balance and its timestamp together.
    async fn upsert(&self, user_id: UserId, point: i64, updated_at: i64) -> Result<UserBalance>;
}

/// Append-only record of balance changes.
#[async_trait]
pub trait HistoryLog: Send + Sync {
    async fn append(&self, entry: NewHistoryEntry) -> Result<HistoryEntry>;
    /// Oldest first; empty if the user has no entries.
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<HistoryEntry>>;
}

/// Source of commit timestamps in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

pub type BalanceStoreBox = Box<dyn BalanceStore>;
pub type HistoryLogBox = Box<dyn HistoryLog>;
pub type ClockBox = Box<dyn Clock>;
