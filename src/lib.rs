//! landing_audit library: landing-page health audit of advertising links
//!
//! This library resolves the destination URLs of ads, following HTTP redirects and
//! client-side redirects (meta refresh and inline script navigation), classifies each
//! final destination (healthy, stub/placeholder, 404, other HTTP error, unreachable) and
//! aggregates the problem links per campaign.
//!
//! # Example
//!
//! ```no_run
//! use landing_audit::inventory::FileSource;
//! use landing_audit::{run_audit, Config};
//! use std::path::PathBuf;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     input: Some(PathBuf::from("links.jsonl")),
//!     max_concurrency: 20,
//!     ..Default::default()
//! };
//! let source = FileSource::load("links.jsonl").await?;
//!
//! let audit = run_audit(&config, &source).await?;
//! println!("{} problem links", audit.report.total_issues());
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

mod app;
pub mod classify;
pub mod config;
mod error_handling;
pub mod fetch;
pub mod initialization;
pub mod inventory;
pub mod models;
pub mod redirect;
pub mod report;
mod utils;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel, Opt};
pub use error_handling::{ConfigError, InitializationError, InventoryError, ProcessingStats};
pub use run::{audit_campaigns, run_audit, AuditReport};

// Internal run module (contains the main audit loop)
mod run {
    use anyhow::{Context, Result};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use futures::stream::FuturesUnordered;
    use futures::StreamExt;
    use log::{error, info, warn};
    use tokio_util::sync::CancellationToken;

    use crate::app::{
        log_progress, print_error_statistics, print_summary, shutdown_gracefully,
    };
    use crate::classify::Classification;
    use crate::config::{Config, LOGGING_INTERVAL};
    use crate::error_handling::{ErrorType, ProcessingStats};
    use crate::fetch::{HttpResolver, ProcessingContext, ResolveOnce};
    use crate::initialization::{init_client, init_semaphore};
    use crate::inventory::{CampaignFilter, CandidateLink, InventorySource};
    use crate::report::{
        export_json, render_text_report, write_report, CampaignReport, IssueAggregator,
        RunMetadata,
    };
    use crate::utils::{process_link, LinkResult};

    /// Results of an audit run.
    #[derive(Debug, Clone)]
    pub struct AuditReport {
        /// Finalized issues per campaign
        pub report: CampaignReport,
        /// Run facts
        pub metadata: RunMetadata,
        /// Rendered text report
        pub text: String,
        /// Whether the text report file was written
        pub output_written: bool,
    }

    /// Runs an audit with the provided configuration and inventory source.
    ///
    /// This is the main entry point for the library. It lists the campaigns of `source`,
    /// resolves every link concurrently, writes the text report (and the JSON report when
    /// configured) and returns the finalized report.
    ///
    /// Problems with individual links or campaigns never fail the run; they are part of
    /// the report. A report file that cannot be written is logged and flagged in
    /// `AuditReport::output_written`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub async fn run_audit(config: &Config, source: &dyn InventorySource) -> Result<AuditReport> {
        let client = init_client(config).context("Failed to initialize HTTP client")?;
        let error_stats = Arc::new(ProcessingStats::new());
        let resolver: Arc<dyn ResolveOnce> =
            Arc::new(HttpResolver::new(client, Arc::clone(&error_stats)));
        let ctx = Arc::new(ProcessingContext::new(
            resolver,
            config.resolver_config(),
            Arc::clone(&error_stats),
        ));

        let aggregator = IssueAggregator::new();
        let metadata = audit_campaigns(config, source, ctx, &aggregator).await;
        let report = aggregator.finalize();

        print_error_statistics(&error_stats);

        let text = render_text_report(&report, &metadata);
        let output_written = write_report(&config.output_file, &text).await;
        if let Some(json_path) = &config.json_output {
            if let Err(e) = export_json(json_path, &report, &metadata).await {
                error!("{e:#}");
            }
        }

        print_summary(
            metadata.links_checked,
            report.total_issues(),
            metadata.duration.as_secs_f64(),
        );

        Ok(AuditReport {
            report,
            metadata,
            text,
            output_written,
        })
    }

    /// Lists campaigns and checks their links, recording outcomes into `aggregator`.
    ///
    /// Links are resolved by a pool of at most `config.max_concurrency` tasks; results are
    /// recorded by this function only. Every submitted link is recorded exactly once.
    /// Does not finalize the aggregator.
    pub async fn audit_campaigns(
        config: &Config,
        source: &dyn InventorySource,
        ctx: Arc<ProcessingContext>,
        aggregator: &IssueAggregator,
    ) -> RunMetadata {
        let start_time = std::time::Instant::now();
        let mut metadata = RunMetadata::started_now();
        info!("Starting audit at {}", metadata.started_at);

        let campaigns = match source.campaigns().await {
            Ok(campaigns) => campaigns,
            Err(e) => {
                error!("Failed to list campaigns: {e}");
                ctx.error_stats
                    .increment_error(ErrorType::InventoryListingError);
                metadata.source_error = Some(e.to_string());
                Vec::new()
            }
        };

        let filter = CampaignFilter::new(&config.include_campaigns, &config.exclude_campaigns);
        let (campaigns, skipped) = filter.partition(campaigns);
        for campaign in &skipped {
            info!("Skipping campaign {} (ID {})", campaign.name, campaign.id);
        }
        metadata.campaigns_total = campaigns.len();
        metadata.skipped_campaigns = skipped.len();
        metadata.skipped_links = skipped
            .iter()
            .map(|campaign| source.known_link_count(campaign))
            .sum();
        info!(
            "Auditing {} campaign(s), {} skipped",
            campaigns.len(),
            skipped.len()
        );

        let checked_links = Arc::new(AtomicUsize::new(0));
        let problem_links = Arc::new(AtomicUsize::new(0));
        let submitted_links = Arc::new(AtomicUsize::new(0));

        let cancel = CancellationToken::new();
        let cancel_logging = cancel.child_token();
        let logging_task = {
            let checked = Arc::clone(&checked_links);
            let problems = Arc::clone(&problem_links);
            let submitted = Arc::clone(&submitted_links);
            Some(tokio::task::spawn(async move {
                let mut interval =
                    tokio::time::interval(std::time::Duration::from_secs(LOGGING_INTERVAL));
                // The first tick completes immediately
                interval.tick().await;
                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            log_progress(start_time, &checked, &problems, &submitted);
                        }
                        _ = cancel_logging.cancelled() => {
                            break;
                        }
                    }
                }
            }))
        };

        let semaphore = init_semaphore(config.max_concurrency);
        let mut tasks = FuturesUnordered::new();

        for campaign in &campaigns {
            aggregator.register_entity(campaign.id, &campaign.name);
            info!("Campaign: {} (ID {})", campaign.name, campaign.id);

            let links = match source.links(campaign).await {
                Ok(links) => links,
                Err(e) => {
                    warn!("Failed to list ads of campaign {}: {e}", campaign.id);
                    ctx.error_stats
                        .increment_error(ErrorType::InventoryListingError);
                    aggregator.record_entity_failure(campaign.id, &campaign.name, &e.to_string());
                    continue;
                }
            };

            for link in links {
                let permit = match Arc::clone(&semaphore).acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        warn!("Semaphore closed, skipping link: {}", link.raw_url);
                        continue;
                    }
                };
                submitted_links.fetch_add(1, Ordering::SeqCst);

                let ctx = Arc::clone(&ctx);
                let fallback = link.clone();
                let handle = tokio::spawn(async move {
                    let _permit = permit;
                    process_link(link, ctx).await
                });
                tasks.push(async move { handle.await.map_err(|e| (fallback, e)) });
            }
        }

        while let Some(task_result) = tasks.next().await {
            checked_links.fetch_add(1, Ordering::SeqCst);
            let is_issue = match task_result {
                Ok(LinkResult {
                    link,
                    outcome,
                    classification,
                }) => aggregator.record_resolved(&link, &outcome, &classification),
                Err((link, join_error)) => {
                    warn!("Task for {} panicked: {join_error:?}", link.raw_url);
                    record_aborted(aggregator, &link, &join_error.to_string())
                }
            };
            if is_issue {
                problem_links.fetch_add(1, Ordering::SeqCst);
            }
        }

        shutdown_gracefully(cancel, logging_task).await;
        log_progress(start_time, &checked_links, &problem_links, &submitted_links);

        metadata.links_checked = checked_links.load(Ordering::SeqCst);
        metadata.duration = start_time.elapsed();
        metadata
    }

    fn record_aborted(aggregator: &IssueAggregator, link: &CandidateLink, reason: &str) -> bool {
        aggregator.record(
            link.entity_id,
            &link.entity_name,
            link.sub_entity_id,
            &link.raw_url,
            &Classification::TransportError(format!("link check aborted: {reason}")),
        )
    }
}
