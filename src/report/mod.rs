//! Run reports.
//!
//! - `aggregator`: thread-safe collection of issues, finalized into a `CampaignReport`
//! - `text`: the human-readable report file
//! - `json`: machine-readable export

mod aggregator;
mod json;
mod text;

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

pub use aggregator::{
    CampaignReport, CampaignSection, CategoryGroup, EntityIssues, Issue, IssueAggregator,
};
pub use json::export_json;
pub use text::{render_text_report, write_report};

/// Facts about a run, reported alongside the issues.
#[derive(Debug, Clone, Serialize)]
pub struct RunMetadata {
    /// Start of the run
    pub started_at: DateTime<Utc>,
    /// Wall-clock duration
    #[serde(rename = "duration_seconds", serialize_with = "serialize_secs")]
    pub duration: Duration,
    /// Campaigns audited
    pub campaigns_total: usize,
    /// Links resolved
    pub links_checked: usize,
    /// Campaigns excluded by the allow/deny lists
    pub skipped_campaigns: usize,
    /// Links of the skipped campaigns; `None` when the source cannot count them cheaply
    pub skipped_links: Option<usize>,
    /// Set when the campaign list itself could not be fetched
    pub source_error: Option<String>,
}

impl RunMetadata {
    /// Metadata for a run starting now.
    pub fn started_now() -> Self {
        Self {
            started_at: Utc::now(),
            duration: Duration::ZERO,
            campaigns_total: 0,
            links_checked: 0,
            skipped_campaigns: 0,
            skipped_links: Some(0),
            source_error: None,
        }
    }
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}
