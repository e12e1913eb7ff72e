//! C-compatible API called by the host runtimes.
//!
//! Ownership rules:
//! - `rust_execute` only borrows its argument for the duration of the call.
//! - Every pointer it returns is owned by the caller and must be passed to
//!   `rust_free_string` exactly once, after the caller is done reading it.
//! - Nothing else may free those pointers.

use std::os::raw::c_char;
use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::info;

use crate::commands::JsonCommandHandler;
use crate::common::config::AppCfg;
use crate::common::log::{self, LogStore};
use crate::executor::{CoreExecutor, Executor};

/// ABI version to coordinate with the host glue.
pub const API_VERSION: u32 = 1;

static EXECUTOR: Lazy<Executor<JsonCommandHandler>> = Lazy::new(|| {
    let cfg = AppCfg::load();
    let store = Arc::new(LogStore::new(cfg.log_capacity));
    log::init(&cfg, Arc::clone(&store));
    info!(
        api_version = API_VERSION,
        worker_threads = cfg.worker_threads,
        "native core initialised"
    );
    Executor::new(JsonCommandHandler::new(cfg, store))
});

#[no_mangle]
pub extern "C" fn rust_api_version() -> u32 {
    API_VERSION
}

/// Execute one command and return a JSON result string (caller must free).
///
/// Never returns null and never unwinds: failures are encoded in the payload.
///
/// # Safety
/// `cmd` must point to a null-terminated string that stays valid and
/// unmodified until this function returns.
#[no_mangle]
pub unsafe extern "C" fn rust_execute(cmd: *const c_char) -> *const c_char {
    EXECUTOR.execute_raw(cmd)
}

/// Free a string returned by [`rust_execute`]. Null is ignored.
///
/// # Safety
/// `ptr` must be null or a pointer from `rust_execute` that was not freed yet.
#[no_mangle]
pub unsafe extern "C" fn rust_free_string(ptr: *const c_char) {
    EXECUTOR.release_raw(ptr as *mut c_char)
}

/// [`CoreExecutor`] that goes through the exported C entry points, the same
/// way foreign host glue does.
#[derive(Clone, Copy, Debug, Default)]
pub struct FfiExecutor;

impl CoreExecutor for FfiExecutor {
    unsafe fn execute_raw(&self, command: *const c_char) -> *mut c_char {
        rust_execute(command) as *mut c_char
    }

    unsafe fn release_raw(&self, ptr: *mut c_char) {
        rust_free_string(ptr)
    }
}
