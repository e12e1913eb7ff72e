//! Public entry points for foreign function interfaces.
//!
//! `ffi` is the stable C ABI used by every host. Host adapters written in
//! Rust sit next to it and call through that same ABI.

pub mod ffi;

#[cfg(feature = "android")]
pub mod android;
