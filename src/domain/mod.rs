//! Domain types and the storage ports the ledger depends on.

pub mod command;
pub mod history;
pub mod point;
pub mod ports;
