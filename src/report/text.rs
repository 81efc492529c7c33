//! Text report.

use std::fmt::Write as _;
use std::path::Path;

use log::{error, info};

use super::{CampaignReport, Issue, RunMetadata};

/// Renders the report file.
///
/// Layout: run header, one block per campaign (`Campaign: <name> (ID <id>)` followed by
/// its issues), a section per issue category, then a summary line.
pub fn render_text_report(report: &CampaignReport, metadata: &RunMetadata) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(
        out,
        "Link audit of {} ({:.1}s)",
        metadata.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
        metadata.duration.as_secs_f64()
    );
    let skipped_links = match metadata.skipped_links {
        Some(n) if metadata.skipped_campaigns > 0 => format!(" ({n} links)"),
        _ => String::new(),
    };
    let _ = writeln!(
        out,
        "Campaigns: {} checked, {} skipped{skipped_links}. Links checked: {}.",
        metadata.campaigns_total, metadata.skipped_campaigns, metadata.links_checked
    );
    if let Some(source_error) = &metadata.source_error {
        let _ = writeln!(out, "Failed to list campaigns: {source_error}");
    }

    for section in &report.campaigns {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Campaign: {} (ID {})",
            display_name(&section.entity_name),
            section.entity_id
        );
        if let Some(listing_error) = &section.listing_error {
            let _ = writeln!(out, "  Failed to list ads: {listing_error}");
        }
        if section.issues.is_empty() && section.listing_error.is_none() {
            let _ = writeln!(out, "  No problems found.");
        }
        for issue in &section.issues {
            let _ = writeln!(out, "  {}", issue_line(issue));
        }
    }

    for group in &report.by_category {
        let count: usize = group.entities.iter().map(|e| e.issues.len()).sum();
        let _ = writeln!(out);
        let _ = writeln!(out, "{} ({count}):", group.category.as_str());
        for entity in &group.entities {
            let _ = writeln!(
                out,
                "  {} (ID {}):",
                display_name(&entity.entity_name),
                entity.entity_id
            );
            for issue in &entity.issues {
                let _ = writeln!(out, "    {}", issue.url);
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", summary_line(report));
    let failures = report.listing_failures();
    if failures > 0 {
        let _ = writeln!(out, "Could not list ads of {failures} campaign(s).");
    }
    out
}

/// One-line verdict of a run.
pub(crate) fn summary_line(report: &CampaignReport) -> String {
    match report.total_issues() {
        0 => "All links are healthy.".to_string(),
        n => format!("Found {n} problem link(s)."),
    }
}

fn issue_line(issue: &Issue) -> String {
    let mut line = format!(
        "Ad {}: {} -> {}",
        issue.sub_entity_id, issue.url, issue.classification
    );
    if let Some(description) = &issue.description {
        // Transport messages are already part of the classification text
        if !line.ends_with(description.as_str()) {
            let _ = write!(line, " ({description})");
        }
    }
    if let Some(final_url) = &issue.final_url {
        if final_url != &issue.url {
            let _ = write!(line, " [final URL: {final_url}]");
        }
    }
    line
}

fn display_name(name: &str) -> &str {
    if name.is_empty() {
        "<unnamed>"
    } else {
        name
    }
}

/// Writes the text report. A failure is logged and reported as `false`; it never aborts
/// the run.
pub async fn write_report(path: &Path, text: &str) -> bool {
    match tokio::fs::write(path, text).await {
        Ok(()) => {
            info!("Report saved to {}", path.display());
            true
        }
        Err(e) => {
            error!("Failed to write report to {}: {e}", path.display());
            false
        }
    }
}
