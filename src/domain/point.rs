use crate::error::PointError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound for any committed balance.
pub const MAX_BALANCE: i64 = 10_000_000;

/// A validated, strictly positive user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(i64);

impl UserId {
    pub fn new(value: i64) -> Result<Self, PointError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(PointError::InvalidId(value))
        }
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for UserId {
    type Error = PointError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for i64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A strictly positive point amount for charges and uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount(i64);

impl Amount {
    pub fn new(value: i64) -> Result<Self, PointError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(PointError::NonPositiveAmount(value))
        }
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Amount {
    type Error = PointError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for i64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// Current point balance of one user.
///
/// Always within `0..=MAX_BALANCE` once committed.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct UserBalance {
    pub user_id: UserId,
    pub point: i64,
    /// Epoch milliseconds of the last commit.
    pub updated_at: i64,
}

impl UserBalance {
    pub fn new(user_id: UserId, point: i64, updated_at: i64) -> Self {
        Self {
            user_id,
            point,
            updated_at,
        }
    }

    /// Balance after adding `amount`, if it stays within the limit.
    pub fn charged(&self, amount: Amount) -> Result<i64, PointError> {
        match self.point.checked_add(amount.value()) {
            Some(next) if next <= MAX_BALANCE => Ok(next),
            _ => Err(PointError::BalanceLimitExceeded {
                user_id: self.user_id.value(),
                current: self.point,
                amount: amount.value(),
            }),
        }
    }

    /// Balance after removing `amount`, if enough points are available.
    pub fn used(&self, amount: Amount) -> Result<i64, PointError> {
        if self.point >= amount.value() {
            Ok(self.point - amount.value())
        } else {
            Err(PointError::InsufficientBalance {
                user_id: self.user_id.value(),
                current: self.point,
                amount: amount.value(),
            })
        }
    }
}
