//! Host module: the object a host runtime registers and calls into.

use crate::executor::domain::CoreExecutor;

use super::domain::HostRuntime;
use super::service::bridge_call;

/// Forwards `nativeExecute` to the boundary without touching the data.
pub struct HostModule<'e, E: ?Sized> {
    executor: &'e E,
}

impl<'e, E: CoreExecutor + ?Sized> HostModule<'e, E> {
    pub fn new(executor: &'e E) -> Self {
        Self { executor }
    }

    pub fn native_execute<R>(&self, runtime: &mut R, command: &R::Command) -> Option<R::Output>
    where
        R: HostRuntime + ?Sized,
    {
        bridge_call(runtime, self.executor, command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use crate::adapter::service::tests::{Echo, Event, Events, FakeHost, Recording};
    use crate::executor::Executor;

    #[test]
    fn delegates_unchanged() {
        let events = Events::default();
        let mut host = FakeHost::new(&events);
        let executor = Recording {
            inner: Executor::new(Echo),
            events: Rc::clone(&events),
        };
        let module = HostModule::new(&executor);

        let output = module.native_execute(&mut host, "status").unwrap();

        assert_eq!(
            output,
            r#"{"res":"status","error":null,"panic":false,"panic_details":null}"#
        );
        assert_eq!(events.borrow().len(), 5);
    }

    #[test]
    fn absent_result_passes_through() {
        let events = Events::default();
        let mut host = FakeHost::new(&events);
        host.fail_acquire = true;
        let executor = Executor::new(Echo);

        assert!(HostModule::new(&executor).native_execute(&mut host, "status").is_none());
        assert_eq!(*events.borrow(), vec![Event::AcquireFailed]);
    }
}
