//! Contracts between a host runtime and the core executor.

use std::ffi::CStr;
use std::os::raw::c_char;
use std::ptr::NonNull;

use crate::executor::domain::CoreExecutor;

/// Borrowed, null-terminated view of a host string.
pub trait CommandView {
    fn as_c_str(&self) -> &CStr;
}

/// Everything the boundary needs from one hosting environment.
pub trait HostRuntime {
    /// Host-native command handle, e.g. a `jstring`.
    type Command: ?Sized;
    /// Host-native string produced for the caller.
    type Output;
    /// Scoped view over a command; dropping it releases the view.
    type View<'a>: CommandView
    where
        Self: 'a;

    /// Borrow a command as a null-terminated byte string.
    /// `None` means the host could not provide it (allocation or encoding failure).
    fn acquire<'a>(&'a mut self, command: &'a Self::Command) -> Option<Self::View<'a>>;

    /// Copy a result into a new host-native string.
    fn new_string(&mut self, result: &CStr) -> Option<Self::Output>;
}

/// An executor result owned by the boundary.
///
/// Dropping it is the one and only way the buffer goes back to the executor.
pub struct ResultString<'e, E: CoreExecutor + ?Sized> {
    ptr: NonNull<c_char>,
    executor: &'e E,
}

impl<'e, E: CoreExecutor + ?Sized> ResultString<'e, E> {
    /// Take ownership of a raw result. Null yields `None` and nothing to release.
    ///
    /// # Safety
    /// `ptr` must be null or an unreleased result of `executor.execute_raw`.
    pub unsafe fn from_raw(executor: &'e E, ptr: *mut c_char) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self { ptr, executor })
    }

    pub fn as_c_str(&self) -> &CStr {
        // SAFETY: the executor hands out null-terminated buffers that stay
        // valid until `release_raw`, which only `drop` calls.
        unsafe { CStr::from_ptr(self.ptr.as_ptr()) }
    }
}

impl<E: CoreExecutor + ?Sized> Drop for ResultString<'_, E> {
    fn drop(&mut self) {
        // SAFETY: `ptr` came from this executor and `drop` runs once.
        unsafe { self.executor.release_raw(self.ptr.as_ptr()) }
    }
}

/// Safe entry into an executor for a borrowed command.
pub fn execute<'e, E>(executor: &'e E, command: &CStr) -> Option<ResultString<'e, E>>
where
    E: CoreExecutor + ?Sized,
{
    // SAFETY: `command` is a valid C string borrowed for the whole call, and
    // the returned pointer is wrapped straight away.
    unsafe { ResultString::from_raw(executor, executor.execute_raw(command.as_ptr())) }
}
