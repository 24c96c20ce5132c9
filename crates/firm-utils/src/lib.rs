//! Shared utilities for firm-analyst
//!
//! This crate provides the ambient pieces used across the workspace:
//! tracing setup and small helpers for reading configuration from the
//! process environment.

pub mod config;
pub mod logging;

pub use config::{ConfigError, LogConfig, LogFormat, env_parse, env_var};
pub use logging::init_tracing;
