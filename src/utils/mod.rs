//! Link processing utilities.

mod process;

pub use process::{process_link, LinkResult};
