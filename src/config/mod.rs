//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, limits, request headers)
//! - CLI option types and parsing
//! - The immutable resolver settings shared by every link task

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, LogFormat, LogLevel, Opt, ResolverConfig};
