use crate::application::ledger::PointLedger;
use crate::application::scheduler::{Completion, LaneScheduler, OperationKind, SchedulerConfig};
use crate::domain::command::{Command, CommandType};
use crate::domain::history::HistoryEntry;
use crate::domain::point::UserBalance;
use crate::error::Result;
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::in_memory::{InMemoryBalanceStore, InMemoryHistoryLog};

/// Entry point for callers that want point operations on a user.
///
/// Each call is queued on the user's lane and resolves once every earlier
/// request for that user has finished.
pub struct PointService {
    scheduler: LaneScheduler,
}

impl PointService {
    pub fn new(scheduler: LaneScheduler) -> Self {
        Self { scheduler }
    }

    /// A service backed by in-memory stores and the system clock.
    pub fn in_memory(config: SchedulerConfig) -> Self {
        let ledger = PointLedger::new(
            Box::new(InMemoryBalanceStore::new()),
            Box::new(InMemoryHistoryLog::new()),
            Box::new(SystemClock),
        );
        Self::new(LaneScheduler::new(ledger, config))
    }

    pub fn scheduler(&self) -> &LaneScheduler {
        &self.scheduler
    }

    pub async fn point(&self, user_id: i64) -> Result<UserBalance> {
        self.scheduler
            .submit(user_id, OperationKind::GetBalance)?
            .wait()
            .await?
            .into_balance()
    }

    pub async fn histories(&self, user_id: i64) -> Result<Vec<HistoryEntry>> {
        self.scheduler
            .submit(user_id, OperationKind::GetHistory)?
            .wait()
            .await?
            .into_history()
    }

    pub async fn charge(&self, user_id: i64, amount: i64) -> Result<UserBalance> {
        self.scheduler
            .submit(user_id, OperationKind::Charge(amount))?
            .wait()
            .await?
            .into_balance()
    }

    pub async fn use_points(&self, user_id: i64, amount: i64) -> Result<UserBalance> {
        self.scheduler
            .submit(user_id, OperationKind::Use(amount))?
            .wait()
            .await?
            .into_balance()
    }

    /// Queues an external command without waiting for it.
    ///
    /// A missing amount on a charge or use is treated as zero and rejected by
    /// the ledger as a non-positive amount.
    pub fn submit(&self, command: &Command) -> Result<Completion> {
        let amount = command.amount.unwrap_or_default();
        let kind = match command.r#type {
            CommandType::Point => OperationKind::GetBalance,
            CommandType::History => OperationKind::GetHistory,
            CommandType::Charge => OperationKind::Charge(amount),
            CommandType::Use => OperationKind::Use(amount),
        };
        self.scheduler.submit(command.user, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::scheduler::Outcome;
    use crate::domain::history::TransactionType;
    use crate::error::PointError;

    #[tokio::test]
    async fn test_service_round_trip() {
        let service = PointService::in_memory(SchedulerConfig::default());

        assert_eq!(service.charge(7, 500).await.unwrap().point, 500);
        assert_eq!(service.use_points(7, 200).await.unwrap().point, 300);
        assert_eq!(service.point(7).await.unwrap().point, 300);

        let history = service.histories(7).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].r#type, TransactionType::Use);
    }

    #[tokio::test]
    async fn test_submit_command_without_amount() {
        let service = PointService::in_memory(SchedulerConfig::default());
        let command = Command {
            r#type: CommandType::Charge,
            user: 1,
            amount: None,
        };

        let result = service.submit(&command).unwrap().wait().await;
        assert!(matches!(result, Err(PointError::NonPositiveAmount(0))));
    }

    #[tokio::test]
    async fn test_submit_then_wait_later() {
        let service = PointService::in_memory(SchedulerConfig::default());

        let charge = service.submit(&Command::charge(2, 25)).unwrap();
        let point = service.submit(&Command::point(2)).unwrap();

        assert!(matches!(charge.wait().await, Ok(Outcome::Balance(_))));
        assert_eq!(point.wait().await.unwrap().into_balance().unwrap().point, 25);
    }
}
