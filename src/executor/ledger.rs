//! Accounting for result strings handed across the boundary.
//!
//! Counters are plain atomics so concurrent calls never contend. With the
//! `ownership-audit` feature (always on under test) the ledger also tracks
//! every live address and rejects releases it did not issue.

use std::os::raw::c_char;
use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(any(test, feature = "ownership-audit"))]
use parking_lot::Mutex;
#[cfg(any(test, feature = "ownership-audit"))]
use std::collections::HashSet;

use crate::common::error::BridgeResult;
#[cfg(any(test, feature = "ownership-audit"))]
use crate::common::error::BridgeError;

#[derive(Debug, Default)]
pub struct AllocationLedger {
    issued: AtomicU64,
    released: AtomicU64,
    #[cfg(any(test, feature = "ownership-audit"))]
    live: Mutex<HashSet<usize>>,
}

impl AllocationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note a freshly allocated result string.
    pub fn record(&self, ptr: *const c_char) {
        self.track(ptr);
        self.issued.fetch_add(1, Ordering::Relaxed);
    }

    /// Note that a result string is about to be freed.
    ///
    /// Must be called before the memory is handed back to the allocator, so a
    /// rejected pointer is never freed.
    pub fn retire(&self, ptr: *const c_char) -> BridgeResult<()> {
        self.untrack(ptr)?;
        self.released.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    pub fn issued(&self) -> u64 {
        self.issued.load(Ordering::Relaxed)
    }

    pub fn released(&self) -> u64 {
        self.released.load(Ordering::Relaxed)
    }

    /// Result strings handed out and not yet released.
    pub fn outstanding(&self) -> u64 {
        self.issued().saturating_sub(self.released())
    }

    #[cfg(any(test, feature = "ownership-audit"))]
    fn track(&self, ptr: *const c_char) {
        self.live.lock().insert(ptr as usize);
    }

    #[cfg(not(any(test, feature = "ownership-audit")))]
    fn track(&self, _ptr: *const c_char) {}

    #[cfg(any(test, feature = "ownership-audit"))]
    fn untrack(&self, ptr: *const c_char) -> BridgeResult<()> {
        if self.live.lock().remove(&(ptr as usize)) {
            Ok(())
        } else {
            Err(BridgeError::unknown_pointer(ptr))
        }
    }

    #[cfg(not(any(test, feature = "ownership-audit")))]
    fn untrack(&self, _ptr: *const c_char) -> BridgeResult<()> {
        Ok(())
    }
}
