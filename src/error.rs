use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PointError {
    #[error("invalid user id: {0}")]
    InvalidId(i64),
    #[error("no point balance for user {0}")]
    UserNotFound(i64),
    #[error("no point history for user {0}")]
    HistoryNotFound(i64),
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(i64),
    #[error("charging {amount} to user {user_id} would exceed the limit (current {current})")]
    BalanceLimitExceeded {
        user_id: i64,
        current: i64,
        amount: i64,
    },
    #[error("user {user_id} cannot use {amount} points (current {current})")]
    InsufficientBalance {
        user_id: i64,
        current: i64,
        amount: i64,
    },
    #[error("lane for user {0} closed before answering")]
    LaneClosed(i64),
    #[error("unexpected outcome: {0}")]
    UnexpectedOutcome(&'static str),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PointError>;

impl PointError {
    /// Stable machine-readable code a transport layer can map to a status.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidId(_) => "INVALID_ID",
            Self::UserNotFound(_) => "USER_POINT_NOT_FOUND",
            Self::HistoryNotFound(_) => "HISTORY_NOT_FOUND",
            Self::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
            Self::BalanceLimitExceeded { .. } => "BALANCE_LIMIT_EXCEEDED",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::LaneClosed(_) => "LANE_CLOSED",
            Self::UnexpectedOutcome(_) => "UNEXPECTED_OUTCOME",
            Self::Csv(_) => "CSV_ERROR",
            Self::Io(_) => "IO_ERROR",
        }
    }

    /// Deterministic validation or business-rule failures. Retrying these
    /// with the same input against the same state fails the same way.
    pub fn is_business_rule(&self) -> bool {
        matches!(
            self,
            Self::InvalidId(_)
                | Self::UserNotFound(_)
                | Self::HistoryNotFound(_)
                | Self::NonPositiveAmount(_)
                | Self::BalanceLimitExceeded { .. }
                | Self::InsufficientBalance { .. }
        )
    }
}

/// Caller-visible error body.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}

impl From<&PointError> for ErrorResponse {
    fn from(err: &PointError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_for_rule_failures() {
        assert_eq!(PointError::InvalidId(0).code(), "INVALID_ID");
        assert_eq!(PointError::UserNotFound(3).code(), "USER_POINT_NOT_FOUND");
        assert_eq!(
            PointError::InsufficientBalance {
                user_id: 1,
                current: 0,
                amount: 5
            }
            .code(),
            "INSUFFICIENT_BALANCE"
        );
        assert!(PointError::HistoryNotFound(1).is_business_rule());
        assert!(!PointError::LaneClosed(1).is_business_rule());
    }

    #[test]
    fn test_error_response_serialization() {
        let err = PointError::NonPositiveAmount(-3);
        let body = ErrorResponse::from(&err);
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(
            json,
            r#"{"code":"NON_POSITIVE_AMOUNT","message":"amount must be positive, got -3"}"#
        );
    }
}
