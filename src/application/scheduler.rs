use crate::application::ledger::PointLedger;
use crate::domain::history::HistoryEntry;
use crate::domain::point::{UserBalance, UserId};
use crate::error::{PointError, Result};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use log::{debug, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, oneshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    GetBalance,
    GetHistory,
    Charge(i64),
    Use(i64),
}

/// Successful result of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Balance(UserBalance),
    History(Vec<HistoryEntry>),
}

impl Outcome {
    pub fn into_balance(self) -> Result<UserBalance> {
        match self {
            Self::Balance(balance) => Ok(balance),
            Self::History(_) => Err(PointError::UnexpectedOutcome("expected a balance")),
        }
    }

    pub fn into_history(self) -> Result<Vec<HistoryEntry>> {
        match self {
            Self::History(entries) => Ok(entries),
            Self::Balance(_) => Err(PointError::UnexpectedOutcome("expected a history")),
        }
    }
}

/// A queued operation together with the channel its result goes back on.
#[derive(Debug)]
pub struct OperationRequest {
    pub user_id: UserId,
    pub kind: OperationKind,
    reply: oneshot::Sender<Result<Outcome>>,
}

/// Handle to the result of a submitted operation.
///
/// Dropping it does not cancel the operation; the lane still runs it so later
/// requests for the same user see its effects.
#[derive(Debug)]
pub struct Completion {
    user_id: UserId,
    receiver: oneshot::Receiver<Result<Outcome>>,
}

impl Completion {
    /// Waits until the lane has executed the operation.
    pub async fn wait(self) -> Result<Outcome> {
        let user_id = self.user_id.value();
        self.receiver
            .await
            .unwrap_or_else(|_| Err(PointError::LaneClosed(user_id)))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SchedulerConfig {
    /// How long an idle lane waits for new work before retiring.
    pub idle_grace: Duration,
}

struct LaneHandle {
    sender: mpsc::UnboundedSender<OperationRequest>,
    /// Accepted but not yet finished requests.
    pending: Arc<AtomicUsize>,
    generation: u64,
}

impl LaneHandle {
    fn enqueue(&self, request: OperationRequest) -> std::result::Result<(), OperationRequest> {
        self.pending.fetch_add(1, Ordering::SeqCst);
        self.sender.send(request).map_err(|mpsc::error::SendError(request)| {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            request
        })
    }
}

/// Runs each user's operations one at a time, in arrival order, while
/// different users proceed on independent lanes.
///
/// A lane is a channel plus a worker task. It is created on the first request
/// for a user and retires once its queue has stayed empty for
/// `SchedulerConfig::idle_grace`.
pub struct LaneScheduler {
    lanes: Arc<DashMap<UserId, LaneHandle>>,
    ledger: Arc<PointLedger>,
    config: SchedulerConfig,
    generations: AtomicU64,
}

impl LaneScheduler {
    pub fn new(ledger: PointLedger, config: SchedulerConfig) -> Self {
        Self {
            lanes: Arc::new(DashMap::new()),
            ledger: Arc::new(ledger),
            config,
            generations: AtomicU64::new(0),
        }
    }

    /// Queues an operation behind every earlier one for the same user.
    ///
    /// Must be called from within a tokio runtime. Ids that can never own a
    /// balance are rejected here without creating a lane.
    pub fn submit(&self, user_id: i64, kind: OperationKind) -> Result<Completion> {
        let user_id = UserId::new(user_id)?;
        let (reply, receiver) = oneshot::channel();
        let request = OperationRequest {
            user_id,
            kind,
            reply,
        };

        // The entry guard is held across the send so that a worker's
        // retirement check never races with an arrival.
        match self.lanes.entry(user_id) {
            Entry::Occupied(mut slot) => {
                if let Err(request) = slot.get().enqueue(request) {
                    warn!("lane for user {} stopped unexpectedly, restarting", user_id);
                    let lane = self.spawn_lane(user_id);
                    lane.enqueue(request)
                        .map_err(|_| PointError::LaneClosed(user_id.value()))?;
                    slot.insert(lane);
                }
            }
            Entry::Vacant(slot) => {
                let lane = self.spawn_lane(user_id);
                lane.enqueue(request)
                    .map_err(|_| PointError::LaneClosed(user_id.value()))?;
                slot.insert(lane);
            }
        }

        Ok(Completion { user_id, receiver })
    }

    /// Number of live lanes.
    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    /// Users that currently own a lane.
    pub fn user_ids(&self) -> Vec<i64> {
        self.lanes.iter().map(|lane| lane.key().value()).collect()
    }

    /// Requests accepted across all lanes that have not finished yet.
    pub fn pending_requests(&self) -> usize {
        self.lanes
            .iter()
            .map(|lane| lane.pending.load(Ordering::SeqCst))
            .sum()
    }

    pub fn has_pending(&self, user_id: i64) -> bool {
        let Ok(user_id) = UserId::new(user_id) else {
            return false;
        };
        self.lanes
            .get(&user_id)
            .is_some_and(|lane| lane.pending.load(Ordering::SeqCst) > 0)
    }

    fn spawn_lane(&self, user_id: UserId) -> LaneHandle {
        let (sender, receiver) = mpsc::unbounded_channel();
        let pending = Arc::new(AtomicUsize::new(0));
        let generation = self.generations.fetch_add(1, Ordering::Relaxed);

        let worker = LaneWorker {
            user_id,
            generation,
            receiver,
            pending: pending.clone(),
            lanes: self.lanes.clone(),
            ledger: self.ledger.clone(),
            idle_grace: self.config.idle_grace,
        };
        debug!("starting lane for user {} (generation {})", user_id, generation);
        tokio::spawn(worker.run());

        LaneHandle {
            sender,
            pending,
            generation,
        }
    }
}

struct LaneWorker {
    user_id: UserId,
    generation: u64,
    receiver: mpsc::UnboundedReceiver<OperationRequest>,
    pending: Arc<AtomicUsize>,
    lanes: Arc<DashMap<UserId, LaneHandle>>,
    ledger: Arc<PointLedger>,
    idle_grace: Duration,
}

impl LaneWorker {
    async fn run(mut self) {
        loop {
            let request = match self.receiver.try_recv() {
                Ok(request) => request,
                Err(TryRecvError::Disconnected) => break,
                Err(TryRecvError::Empty) => {
                    match tokio::time::timeout(self.idle_grace, self.receiver.recv()).await {
                        Ok(Some(request)) => request,
                        Ok(None) => break,
                        Err(_) if self.retire() => break,
                        Err(_) => continue,
                    }
                }
            };

            self.execute(request).await;
            self.pending.fetch_sub(1, Ordering::SeqCst);
        }
        debug!(
            "lane for user {} (generation {}) retired",
            self.user_id, self.generation
        );
    }

    /// Removes this lane from the registry if it is still the registered one
    /// and nothing is queued. Runs under the same entry lock `submit` holds
    /// while enqueueing.
    fn retire(&self) -> bool {
        self.lanes
            .remove_if(&self.user_id, |_, lane| {
                lane.generation == self.generation && lane.pending.load(Ordering::SeqCst) == 0
            })
            .is_some()
    }

    async fn execute(&self, request: OperationRequest) {
        let OperationRequest {
            user_id,
            kind,
            reply,
        } = request;
        let user = user_id.value();

        let outcome = match kind {
            OperationKind::GetBalance => self.ledger.balance(user).await.map(Outcome::Balance),
            OperationKind::GetHistory => self.ledger.history(user).await.map(Outcome::History),
            OperationKind::Charge(amount) => {
                self.ledger.charge(user, amount).await.map(Outcome::Balance)
            }
            OperationKind::Use(amount) => {
                self.ledger.use_points(user, amount).await.map(Outcome::Balance)
            }
        };

        if reply.send(outcome).is_err() {
            warn!(
                "caller for user {} went away before {:?} completed",
                user, kind
            );
        }
    }
}
