//! Boundary adapter: moves a host string through the executor and back.
//!
//! Host-specific shims implement [`HostRuntime`]; the ordering and the single
//! release path live in [`service::bridge_call`].

pub mod domain;
pub mod host;
pub mod mutf8;
pub mod service;

pub use domain::{CommandView, HostRuntime, ResultString};
pub use host::HostModule;
pub use mutf8::decode_modified_utf8;
pub use service::bridge_call;
