//! Progress logging.

use log::info;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Logs how many links have been resolved so far.
///
/// `total` is the number of links submitted; it grows while campaigns are still being
/// listed.
pub fn log_progress(
    start_time: std::time::Instant,
    checked_links: &AtomicUsize,
    problem_links: &AtomicUsize,
    total: &AtomicUsize,
) {
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let checked = checked_links.load(Ordering::SeqCst);
    let problems = problem_links.load(Ordering::SeqCst);
    let total = total.load(Ordering::SeqCst);
    let rate = if elapsed_secs > 0.0 {
        checked as f64 / elapsed_secs
    } else {
        0.0
    };
    info!(
        "Checked {checked}/{total} links ({problems} with problems) in {elapsed_secs:.2} seconds (~{rate:.2} links/sec)"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_progress_at_start() {
        // Zero elapsed time and zero counters must not divide by zero or panic
        log_progress(
            std::time::Instant::now(),
            &AtomicUsize::new(0),
            &AtomicUsize::new(0),
            &AtomicUsize::new(0),
        );
    }
}
