//! Core executor: turns a borrowed command string into an owned result string.
//!
//! Calls share no mutable state apart from the ledger counters, so one
//! executor can be driven from any number of threads at once.

pub mod domain;
pub mod ledger;
pub mod service;

pub use domain::{CommandHandler, CommandResult, CoreExecutor, PanicDetails};
pub use ledger::AllocationLedger;
pub use service::Executor;
