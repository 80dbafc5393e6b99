//! CLI command implementations.

pub mod config;
pub mod rubric;
pub mod session;
