// lib.rs - native core behind the React Native module
pub mod adapter;
pub mod api;
pub mod commands;
pub mod common;
pub mod executor;

pub use api::ffi::{rust_api_version, rust_execute, rust_free_string};
