use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    Point,
    History,
    Charge,
    Use,
}

/// An externally supplied request, before any validation.
#[derive(Debug, Deserialize, PartialEq, Eq, Clone)]
pub struct Command {
    pub r#type: CommandType,
    pub user: i64,
    pub amount: Option<i64>,
}

impl Command {
    pub fn point(user: i64) -> Self {
        Self {
            r#type: CommandType::Point,
            user,
            amount: None,
        }
    }

    pub fn history(user: i64) -> Self {
        Self {
            r#type: CommandType::History,
            user,
            amount: None,
        }
    }

    pub fn charge(user: i64, amount: i64) -> Self {
        Self {
            r#type: CommandType::Charge,
            user,
            amount: Some(amount),
        }
    }

    pub fn use_points(user: i64, amount: i64) -> Self {
        Self {
            r#type: CommandType::Use,
            user,
            amount: Some(amount),
        }
    }
}
