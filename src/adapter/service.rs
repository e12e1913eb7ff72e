//! The boundary protocol shared by every host adapter.

use tracing::{error, warn};

use crate::executor::domain::CoreExecutor;

use super::domain::{execute, CommandView, HostRuntime};

/// Carry one host command through the executor and back.
///
/// Order is fixed: acquire the view, execute, release the view, copy the
/// result into a host string, release the result. Returns `None` when the
/// view cannot be acquired (the executor is not called) or when the executor
/// hands back null.
pub fn bridge_call<R, E>(runtime: &mut R, executor: &E, command: &R::Command) -> Option<R::Output>
where
    R: HostRuntime + ?Sized,
    E: CoreExecutor + ?Sized,
{
    let Some(view) = runtime.acquire(command) else {
        warn!("host string could not be acquired; executor not called");
        return None;
    };

    let result = execute(executor, view.as_c_str());
    drop(view);

    let Some(result) = result else {
        error!("executor returned a null result");
        return None;
    };

    let output = runtime.new_string(result.as_c_str());
    if output.is_none() {
        warn!("host string construction failed");
    }
    drop(result);
    output
}
