//! Error handling primitives shared across the bridge.
//!
//! Command failures travel as `eyre` reports inside the result payload; the
//! types here cover the boundary itself.

use std::ffi::NulError;

use thiserror::Error;

/// Canonical error type for the boundary and the executor.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The pointer handed to `release` is not a live result of this executor.
    #[error("pointer {addr:#x} was not issued by this executor or was already released")]
    UnknownPointer { addr: usize },

    #[error("failed to serialize command result: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("result payload contains an interior NUL byte")]
    InteriorNul(#[from] NulError),

    #[error("failed to start command runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Result alias used throughout the crate.
pub type BridgeResult<T> = Result<T, BridgeError>;

impl BridgeError {
    /// Ownership violation helper.
    pub fn unknown_pointer<T>(ptr: *const T) -> Self {
        Self::UnknownPointer {
            addr: ptr as usize,
        }
    }
}
