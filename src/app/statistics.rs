//! Statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{ErrorType, InfoType, ProcessingStats};

/// Prints a one-line summary of the run.
///
/// Works with both plain and JSON log formats (log::info! handles formatting).
pub fn print_summary(links_checked: usize, problem_links: usize, elapsed_seconds: f64) {
    info!(
        "✅ Checked {} link{} ({} with problems) in {:.1}s",
        links_checked,
        if links_checked == 1 { "" } else { "s" },
        problem_links,
        elapsed_seconds
    );
}

/// Prints error and info statistics to the log.
pub fn print_error_statistics(error_stats: &ProcessingStats) {
    let total_errors = error_stats.total_errors();
    let total_info = error_stats.total_info();

    if total_errors > 0 {
        info!("Error Counts ({} total):", total_errors);
        for error_type in ErrorType::iter() {
            let count = error_stats.get_error_count(error_type);
            if count > 0 {
                info!("   {}: {}", error_type.as_str(), count);
            }
        }
    }

    if total_info > 0 {
        info!("Info Counts ({} total):", total_info);
        for info_type in InfoType::iter() {
            let count = error_stats.get_info_count(info_type);
            if count > 0 {
                info!("   {}: {}", info_type.as_str(), count);
            }
        }
    }
}
