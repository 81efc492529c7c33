//! Error handling and processing statistics.
//!
//! This module provides:
//! - Typed errors for initialization, configuration and inventory listing
//! - Transport and status categorization of resolution failures
//! - The recheck pause schedule and the inventory API retry strategy
//! - Processing statistics tracking (error categories and info metrics)

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{
    categorize_reqwest_error, categorize_status, describe_transport_error, get_retry_strategy,
    is_retriable_inventory_error, recheck_schedule,
};
pub use stats::ProcessingStats;
pub use types::{ConfigError, ErrorType, InfoType, InitializationError, InventoryError};
