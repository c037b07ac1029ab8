use crate::domain::history::{HistoryEntry, NewHistoryEntry, TransactionType};
use crate::domain::point::{Amount, UserBalance, UserId};
use crate::domain::ports::{BalanceStoreBox, ClockBox, HistoryLogBox};
use crate::error::{PointError, Result};
use log::info;

/// Point rules over the balance store and history log.
///
/// `PointLedger` has no locking of its own. Every call must come from the
/// lane that owns `user_id`, which is what keeps one user's read, check and
/// write free of interleaving. All validation runs before the first write, so
/// a failed call leaves no trace.
pub struct PointLedger {
    balances: BalanceStoreBox,
    history: HistoryLogBox,
    clock: ClockBox,
}

impl PointLedger {
    /// Creates a new `PointLedger`.
    ///
    /// # Arguments
    ///
    /// * `balances` - The store for current balances.
    /// * `history` - The log of committed charges and uses.
    /// * `clock` - Source of commit timestamps.
    pub fn new(balances: BalanceStoreBox, history: HistoryLogBox, clock: ClockBox) -> Self {
        Self {
            balances,
            history,
            clock,
        }
    }

    pub async fn balance(&self, user_id: i64) -> Result<UserBalance> {
        let user_id = UserId::new(user_id)?;
        self.balances
            .get(user_id)
            .await?
            .ok_or(PointError::UserNotFound(user_id.value()))
    }

    pub async fn history(&self, user_id: i64) -> Result<Vec<HistoryEntry>> {
        let user_id = UserId::new(user_id)?;
        let entries = self.history.list_by_user(user_id).await?;
        if entries.is_empty() {
            return Err(PointError::HistoryNotFound(user_id.value()));
        }
        Ok(entries)
    }

    /// Adds `amount` points, creating the balance on a user's first charge.
    pub async fn charge(&self, user_id: i64, amount: i64) -> Result<UserBalance> {
        let user_id = UserId::new(user_id)?;
        let amount = Amount::new(amount)?;

        let next = match self.balances.get(user_id).await? {
            Some(current) => current.charged(amount)?,
            None => UserBalance::new(user_id, 0, 0).charged(amount)?,
        };

        let updated = self
            .commit(user_id, next, amount.value(), TransactionType::Charge)
            .await?;
        info!(
            "user {} charged {}, balance {}",
            user_id,
            amount.value(),
            updated.point
        );
        Ok(updated)
    }

    /// Removes `amount` points. A user without a balance has nothing to use.
    pub async fn use_points(&self, user_id: i64, amount: i64) -> Result<UserBalance> {
        let user_id = UserId::new(user_id)?;
        let amount = Amount::new(amount)?;

        let current = self
            .balances
            .get(user_id)
            .await?
            .ok_or(PointError::InsufficientBalance {
                user_id: user_id.value(),
                current: 0,
                amount: amount.value(),
            })?;
        let next = current.used(amount)?;

        let updated = self
            .commit(user_id, next, -amount.value(), TransactionType::Use)
            .await?;
        info!(
            "user {} used {}, balance {}",
            user_id,
            amount.value(),
            updated.point
        );
        Ok(updated)
    }

    async fn commit(
        &self,
        user_id: UserId,
        point: i64,
        signed_amount: i64,
        r#type: TransactionType,
    ) -> Result<UserBalance> {
        let now = self.clock.now();
        let updated = self.balances.upsert(user_id, point, now).await?;
        self.history
            .append(NewHistoryEntry {
                user_id,
                amount: signed_amount,
                r#type,
                timestamp: now,
            })
            .await?;
        Ok(updated)
    }
}
