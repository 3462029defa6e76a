//! CLI command implementations.

pub mod remote;
pub mod serve;
