//! AWS-oriented adapters and handler for the runtime compliance hook.
//!
//! This crate owns runtime integration details (environment configuration,
//! the parameter-store seam, and the hook handler) on top of the AWS-free
//! primitives in `runtime_hook_core`.

pub mod adapters;
pub mod config;
pub mod handlers;
mod logging;
