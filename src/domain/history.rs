use super::point::UserId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Charge,
    Use,
}

/// One committed balance change. Immutable once appended.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct HistoryEntry {
    /// Assigned by the history log; unique and increasing across all users.
    pub id: u64,
    pub user_id: UserId,
    /// Positive for charges, negative for uses.
    pub amount: i64,
    pub r#type: TransactionType,
    pub timestamp: i64,
}

/// A history entry before the log has assigned its id.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct NewHistoryEntry {
    pub user_id: UserId,
    pub amount: i64,
    pub r#type: TransactionType,
    pub timestamp: i64,
}

impl NewHistoryEntry {
    pub fn with_id(self, id: u64) -> HistoryEntry {
        HistoryEntry {
            id,
            user_id: self.user_id,
            amount: self.amount,
            r#type: self.r#type,
            timestamp: self.timestamp,
        }
    }
}
