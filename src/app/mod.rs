//! Application helpers.
//!
//! This module provides utilities for URL validation, progress logging, shutdown handling,
//! and statistics printing used by the audit run.

pub mod logging;
pub mod shutdown;
pub mod statistics;
pub mod url;

// Re-export public API
pub use logging::log_progress;
pub use shutdown::shutdown_gracefully;
pub use statistics::{print_error_statistics, print_summary};
pub use url::validate_and_normalize_url;
