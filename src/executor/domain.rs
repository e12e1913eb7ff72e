//! Core executor contracts: the command capability, the raw allocate/release
//! pair and the result envelope.

use std::ffi::CStr;
use std::os::raw::c_char;

use serde::{Deserialize, Serialize};

/// Opaque command logic behind the executor.
///
/// Implementations receive the raw bytes of one command (terminator excluded)
/// and return the serialized result. They may fail or even panic; the
/// executor turns both into payload content.
pub trait CommandHandler: Send + Sync {
    fn handle(&self, command: &[u8]) -> eyre::Result<String>;

    /// Short name of the command used in panic reports.
    fn label(&self, command: &[u8]) -> String {
        let _ = command;
        "Unknown".to_string()
    }
}

/// Raw allocate/release pair exposed by the core executor.
pub trait CoreExecutor {
    /// Run one command and return an owned, null-terminated result.
    ///
    /// # Safety
    /// `command` must point to a valid null-terminated string that stays
    /// alive and unmodified until this call returns.
    unsafe fn execute_raw(&self, command: *const c_char) -> *mut c_char;

    /// Free a result produced by [`CoreExecutor::execute_raw`].
    ///
    /// # Safety
    /// `ptr` must come from `execute_raw` on this executor and must not have
    /// been released before.
    unsafe fn release_raw(&self, ptr: *mut c_char);
}

/// JSON envelope written into every result string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    pub res: Option<String>,
    pub error: Option<String>,
    pub panic: bool,
    pub panic_details: Option<PanicDetails>,
}

/// Where and why a handler panicked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanicDetails {
    pub cmd: String,
    pub msg: String,
}

impl CommandResult {
    pub fn success(res: String) -> Self {
        Self {
            res: Some(res),
            error: None,
            panic: false,
            panic_details: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            res: None,
            error: Some(error.into()),
            panic: false,
            panic_details: None,
        }
    }

    pub fn panicked(details: PanicDetails) -> Self {
        Self {
            res: None,
            error: None,
            panic: true,
            panic_details: Some(details),
        }
    }
}

/// Payload returned when the envelope itself cannot be encoded.
pub const FALLBACK_PAYLOAD: &CStr =
    cr#"{"res":null,"error":"failed to encode command result","panic":false,"panic_details":null}"#;
