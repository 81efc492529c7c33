//! Delayed rechecks.
//!
//! Some destinations redirect to a placeholder briefly while an offer is being switched.
//! Links landing on a configured host are fetched again after a fixed delay; the last
//! attempt is authoritative.

use log::{debug, info};

use crate::classify::{classify, StubRegistry};
use crate::config::ResolverConfig;
use crate::error_handling::{recheck_schedule, InfoType, ProcessingStats};
use crate::models::{host_of, ResolutionAttempt, ResolvedOutcome};

use super::resolver::ResolveOnce;

/// Resolves `url`, rechecking while the latest attempt lands on a recheck host.
///
/// Makes at most `1 + recheck_attempts` fetches. Eligibility is evaluated before each
/// recheck on the host of the most recent attempt's final URL (the requested URL's host
/// when the attempt failed at the transport level), so a link that moves off a recheck
/// host stops being rechecked. A transport failure on a recheck replaces an earlier
/// response.
pub async fn resolve_with_recheck<R>(
    resolver: &R,
    url: &str,
    config: &ResolverConfig,
    stubs: &StubRegistry,
    stats: &ProcessingStats,
) -> ResolvedOutcome
where
    R: ResolveOnce + ?Sized,
{
    let first = resolver.resolve_once(url, config.timeout).await;
    let first_classification = classify(&first, stubs);
    let mut current = first;
    let mut attempt_count: u32 = 1;

    for delay in recheck_schedule(config.recheck_delay, config.recheck_attempts) {
        let host = eligibility_host(&current);
        if !config.is_recheck_host(host.as_deref()) {
            break;
        }
        debug!(
            "Rechecking {url} in {}s (attempt {} of {})",
            delay.as_secs_f64(),
            attempt_count + 1,
            config.recheck_attempts + 1
        );
        tokio::time::sleep(delay).await;
        current = resolver.resolve_once(url, config.timeout).await;
        attempt_count += 1;
        stats.increment_info(InfoType::RecheckPerformed);
    }

    let classification = classify(&current, stubs);
    if attempt_count > 1 && classification != first_classification {
        info!("Recheck changed outcome of {url}: {first_classification} -> {classification}");
        stats.increment_info(InfoType::RecheckChangedOutcome);
    }

    let is_stub = current.final_url().is_some_and(|u| stubs.matches(u));
    ResolvedOutcome {
        attempt: current,
        attempt_count,
        is_stub,
    }
}

fn eligibility_host(attempt: &ResolutionAttempt) -> Option<String> {
    attempt
        .final_host()
        .or_else(|| host_of(&attempt.requested_url))
}
