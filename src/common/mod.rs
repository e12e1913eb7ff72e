//! Shared plumbing: configuration, errors and logging.
pub mod config;
pub mod error;
pub mod log;

pub use config::AppCfg;
pub use error::{BridgeError, BridgeResult};
