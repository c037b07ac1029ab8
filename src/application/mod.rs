//! Application layer: the point rules, the per-user lane scheduler that
//! serializes them, and the service callers talk to.
//!
//! Requests for one user are queued on that user's lane (a `tokio` channel
//! drained by a single task), so they run one at a time in arrival order.
//! Different users never share a lane or a lock.

pub mod ledger;
pub mod scheduler;
pub mod service;
