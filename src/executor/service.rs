//! The executor: runs a handler and hands out owned result strings.
//!
//! Every string leaving `execute` comes from `CString::into_raw` and goes back
//! through `release`, which reclaims it with `CString::from_raw`. Nothing else
//! in the crate frees these buffers.

use std::any::Any;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{self, AssertUnwindSafe};

use tracing::{error, warn};

use crate::common::error::{BridgeError, BridgeResult};

use super::domain::{CommandHandler, CommandResult, CoreExecutor, PanicDetails, FALLBACK_PAYLOAD};
use super::ledger::AllocationLedger;

pub struct Executor<H> {
    handler: H,
    ledger: AllocationLedger,
}

impl<H: CommandHandler> Executor<H> {
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            ledger: AllocationLedger::new(),
        }
    }

    pub fn ledger(&self) -> &AllocationLedger {
        &self.ledger
    }

    /// Run one command and return a new, non-null, null-terminated buffer.
    ///
    /// The command is only read during this call. The returned pointer is
    /// owned by the caller until it is passed to [`Executor::release`].
    pub fn execute(&self, command: &CStr) -> *mut c_char {
        let result = self.run(command.to_bytes());
        self.issue(&result)
    }

    /// Give a result string back.
    ///
    /// A null pointer is ignored. Under `ownership-audit` a pointer this
    /// executor does not consider live is rejected and left untouched.
    ///
    /// # Safety
    /// `ptr` must be null or a pointer returned by [`Executor::execute`] on
    /// this executor that has not been released yet.
    pub unsafe fn release(&self, ptr: *mut c_char) -> BridgeResult<()> {
        if ptr.is_null() {
            return Ok(());
        }
        self.ledger.retire(ptr)?;
        drop(CString::from_raw(ptr));
        Ok(())
    }

    fn run(&self, command: &[u8]) -> CommandResult {
        match panic::catch_unwind(AssertUnwindSafe(|| self.handler.handle(command))) {
            Ok(Ok(res)) => CommandResult::success(res),
            Ok(Err(err)) => {
                error!("cmd error: {err:#}");
                CommandResult::failure(format!("{err:#}"))
            }
            Err(payload) => {
                let cmd = panic::catch_unwind(AssertUnwindSafe(|| self.handler.label(command)))
                    .unwrap_or_else(|_| "Unknown".to_string());
                let details = PanicDetails {
                    cmd,
                    msg: panic_message(payload.as_ref()),
                };
                error!(cmd = %details.cmd, "panic in command: {}", details.msg);
                CommandResult::panicked(details)
            }
        }
    }

    fn issue(&self, result: &CommandResult) -> *mut c_char {
        let payload = encode(result).unwrap_or_else(|err| {
            error!("falling back to static payload: {err}");
            CString::from(FALLBACK_PAYLOAD)
        });
        let ptr = payload.into_raw();
        self.ledger.record(ptr);
        ptr
    }
}

impl<H: CommandHandler> CoreExecutor for Executor<H> {
    unsafe fn execute_raw(&self, command: *const c_char) -> *mut c_char {
        if command.is_null() {
            warn!("execute called with a null command pointer");
            return self.issue(&CommandResult::failure("command pointer is null"));
        }
        self.execute(CStr::from_ptr(command))
    }

    unsafe fn release_raw(&self, ptr: *mut c_char) {
        if let Err(err) = self.release(ptr) {
            error!("rejected release: {err}");
        }
    }
}

fn encode(result: &CommandResult) -> BridgeResult<CString> {
    let json = serde_json::to_string(result)?;
    CString::new(json).map_err(BridgeError::from)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    struct Ack;

    impl CommandHandler for Ack {
        fn handle(&self, command: &[u8]) -> eyre::Result<String> {
            let text = std::str::from_utf8(command)?;
            match text {
                "fail" => eyre::bail!("refused"),
                "boom" => panic!("handler exploded"),
                _ => Ok(format!("ack:{text}")),
            }
        }

        fn label(&self, command: &[u8]) -> String {
            String::from_utf8_lossy(command).into_owned()
        }
    }

    /// Copy the payload out, then give the buffer back exactly once.
    fn take(executor: &Executor<Ack>, ptr: *mut c_char) -> CommandResult {
        assert!(!ptr.is_null());
        let bytes = unsafe { CStr::from_ptr(ptr) }.to_bytes().to_vec();
        unsafe { executor.release(ptr) }.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn ping_round_trip_is_exact() {
        let executor = Executor::new(Ack);
        let before = executor.ledger().outstanding();

        let ptr = executor.execute(c"ping");
        assert_eq!(executor.ledger().outstanding(), before + 1);
        let result = take(&executor, ptr);

        assert_eq!(result, CommandResult::success("ack:ping".into()));
        assert_eq!(executor.ledger().outstanding(), before);
    }

    #[test]
    fn multibyte_input_survives() {
        let executor = Executor::new(Ack);
        let command = CString::new("héllo wörld ✓ 🦀").unwrap();
        let result = take(&executor, executor.execute(&command));
        assert_eq!(result.res.as_deref(), Some("ack:héllo wörld ✓ 🦀"));
    }

    #[test]
    fn handler_errors_become_payload() {
        let executor = Executor::new(Ack);
        let result = take(&executor, executor.execute(c"fail"));
        assert_eq!(result.error.as_deref(), Some("refused"));
        assert!(result.res.is_none());
        assert!(!result.panic);
    }

    #[test]
    fn invalid_utf8_becomes_payload() {
        let executor = Executor::new(Ack);
        let command = CString::new(vec![0xff, 0xfe]).unwrap();
        let result = take(&executor, executor.execute(&command));
        assert!(result.error.unwrap().contains("utf-8"));
    }

    #[test]
    fn panics_are_caught_and_reported() {
        let executor = Executor::new(Ack);
        let result = take(&executor, executor.execute(c"boom"));
        assert!(result.panic);
        let details = result.panic_details.unwrap();
        assert_eq!(details.cmd, "boom");
        assert_eq!(details.msg, "handler exploded");
        assert_eq!(executor.ledger().outstanding(), 0);
    }

    /// Handler whose panic report itself panics.
    struct Unlabelled;

    impl CommandHandler for Unlabelled {
        fn handle(&self, _command: &[u8]) -> eyre::Result<String> {
            panic!("handle exploded");
        }

        fn label(&self, _command: &[u8]) -> String {
            panic!("label exploded");
        }
    }

    #[test]
    fn panicking_label_does_not_escape() {
        let executor = Executor::new(Unlabelled);

        let ptr = panic::catch_unwind(AssertUnwindSafe(|| executor.execute(c"x")))
            .expect("panic escaped Executor::execute");
        assert!(!ptr.is_null());
        let bytes = unsafe { CStr::from_ptr(ptr) }.to_bytes().to_vec();
        unsafe { executor.release(ptr) }.unwrap();

        let result: CommandResult = serde_json::from_slice(&bytes).unwrap();
        assert!(result.panic);
        let details = result.panic_details.unwrap();
        assert_eq!(details.cmd, "Unknown");
        assert_eq!(details.msg, "handle exploded");
        assert_eq!(executor.ledger().outstanding(), 0);
    }

    #[test]
    fn null_command_still_yields_a_buffer() {
        let executor = Executor::new(Ack);
        let ptr = unsafe { executor.execute_raw(std::ptr::null()) };
        let result = take(&executor, ptr);
        assert_eq!(result.error.as_deref(), Some("command pointer is null"));
    }

    #[test]
    fn release_accepts_null() {
        let executor = Executor::new(Ack);
        unsafe { executor.release(std::ptr::null_mut()) }.unwrap();
        assert_eq!(executor.ledger().released(), 0);
    }

    #[test]
    fn double_release_is_flagged() {
        let executor = Executor::new(Ack);
        let ptr = executor.execute(c"once");
        unsafe { executor.release(ptr) }.unwrap();

        let err = unsafe { executor.release(ptr) }.unwrap_err();
        assert!(matches!(err, BridgeError::UnknownPointer { .. }));
        assert_eq!(executor.ledger().released(), 1);
        assert_eq!(executor.ledger().outstanding(), 0);
    }

    #[test]
    fn foreign_pointer_is_flagged() {
        let executor = Executor::new(Ack);
        let foreign = CString::new("not ours").unwrap().into_raw();

        assert!(unsafe { executor.release(foreign) }.is_err());
        assert_eq!(executor.ledger().released(), 0);

        // Still ours to free.
        drop(unsafe { CString::from_raw(foreign) });
    }

    #[test]
    fn release_from_another_executor_is_flagged() {
        let first = Executor::new(Ack);
        let second = Executor::new(Ack);
        let ptr = first.execute(c"mine");

        assert!(unsafe { second.release(ptr) }.is_err());
        take(&first, ptr);
        assert_eq!(first.ledger().outstanding(), 0);
    }

    #[test]
    fn concurrent_calls_stay_paired() {
        let executor = Arc::new(Executor::new(Ack));
        let handles: Vec<_> = (0..16)
            .map(|worker| {
                let executor = Arc::clone(&executor);
                thread::spawn(move || {
                    for round in 0..50 {
                        let command = CString::new(format!("w{worker}-r{round}")).unwrap();
                        let result = take(&executor, executor.execute(&command));
                        assert_eq!(result.res.unwrap(), format!("ack:w{worker}-r{round}"));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(executor.ledger().issued(), 16 * 50);
        assert_eq!(executor.ledger().outstanding(), 0);
    }
}
