//! Per-link processing: resolve (with rechecks), classify, count.

use std::sync::Arc;

use log::{info, warn};

use crate::app::validate_and_normalize_url;
use crate::classify::{classify, Classification};
use crate::error_handling::{categorize_status, ErrorType};
use crate::fetch::{resolve_with_recheck, ProcessingContext};
use crate::inventory::CandidateLink;
use crate::models::ResolvedOutcome;

/// Result of checking one candidate link.
#[derive(Debug, Clone)]
pub struct LinkResult {
    /// The link as listed by the inventory source
    pub link: CandidateLink,
    /// Authoritative resolution
    pub outcome: ResolvedOutcome,
    /// Semantic outcome
    pub classification: Classification,
}

/// Checks a single link.
///
/// Never fails: every link yields exactly one outcome. Links that do not pass URL
/// validation are still resolved with their raw value, so they surface as transport
/// errors.
pub async fn process_link(link: CandidateLink, ctx: Arc<ProcessingContext>) -> LinkResult {
    log::debug!("Starting process for link: {}", link.raw_url);

    let url = validate_and_normalize_url(&link.raw_url).unwrap_or_else(|| link.raw_url.clone());
    let outcome = resolve_with_recheck(
        ctx.resolver.as_ref(),
        &url,
        &ctx.config,
        &ctx.stubs,
        &ctx.error_stats,
    )
    .await;
    let classification = classify(&outcome.attempt, &ctx.stubs);

    match &classification {
        Classification::Ok => info!(
            "Campaign {} ad {}: {} -> OK ({})",
            link.entity_id,
            link.sub_entity_id,
            link.raw_url,
            outcome.final_url().unwrap_or_default()
        ),
        other => {
            match other {
                Classification::Stub => ctx.error_stats.increment_error(ErrorType::StubDestination),
                Classification::NotFound | Classification::OtherHttpError(_) => {
                    if let Some(error_type) = outcome.status_code().and_then(categorize_status) {
                        ctx.error_stats.increment_error(error_type);
                    }
                }
                // Transport kinds are counted by the resolver
                _ => {}
            }
            warn!(
                "Campaign {} ad {}: {} -> {other}",
                link.entity_id, link.sub_entity_id, link.raw_url
            );
        }
    }

    LinkResult {
        link,
        outcome,
        classification,
    }
}
