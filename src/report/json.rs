//! JSON export of a finalized report.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::{CampaignReport, RunMetadata};

#[derive(Serialize)]
struct JsonReport<'a> {
    metadata: &'a RunMetadata,
    total_issues: usize,
    report: &'a CampaignReport,
}

/// Writes `report` and `metadata` as pretty-printed JSON to `path`.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub async fn export_json(path: &Path, report: &CampaignReport, metadata: &RunMetadata) -> Result<()> {
    let document = JsonReport {
        metadata,
        total_issues: report.total_issues(),
        report,
    };
    let bytes = serde_json::to_vec_pretty(&document).context("Failed to serialize report")?;
    tokio::fs::write(path, bytes)
        .await
        .context(format!("Failed to write JSON report: {}", path.display()))?;
    Ok(())
}
