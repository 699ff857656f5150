//! Shared runtime compliance hook primitives.
//!
//! This crate owns the hook request/verdict contract, allow-list parsing, and
//! the compliance decision itself. It intentionally excludes AWS SDK and
//! Lambda runtime concerns.

pub mod allow_list;
pub mod contract;
pub mod evaluation;
