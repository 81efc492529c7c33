//! Issue aggregation.
//!
//! Link tasks finish in any order; the aggregator collects their non-OK outcomes behind a
//! mutex and produces a deterministic report on `finalize`.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::warn;
use serde::Serialize;

use crate::classify::{Classification, IssueCategory};
use crate::inventory::CandidateLink;
use crate::models::ResolvedOutcome;

/// A problem link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Campaign identifier
    pub entity_id: i64,
    /// Ad identifier
    pub sub_entity_id: i64,
    /// URL as listed in the ad
    pub url: String,
    /// Final URL of the authoritative attempt, when a response was received
    pub final_url: Option<String>,
    /// Outcome (never `Ok`)
    pub classification: Classification,
    /// Human description, e.g. "page not found"
    pub description: Option<String>,
}

/// Issues of one campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignSection {
    /// Campaign identifier
    pub entity_id: i64,
    /// Campaign name
    pub entity_name: String,
    /// Issues ordered by ad id, then URL
    pub issues: Vec<Issue>,
    /// Set when the campaign's links could not be listed
    pub listing_error: Option<String>,
}

/// Issues of one category for one campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityIssues {
    /// Campaign identifier
    pub entity_id: i64,
    /// Campaign name
    pub entity_name: String,
    /// Issues of the category
    pub issues: Vec<Issue>,
}

/// All issues of one category, by campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryGroup {
    /// Category
    pub category: IssueCategory,
    /// Campaigns with at least one issue of the category
    pub entities: Vec<EntityIssues>,
}

/// Finalized, read-only result of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CampaignReport {
    /// Every known campaign in registration order, including those without issues
    pub campaigns: Vec<CampaignSection>,
    /// Issues grouped by category (report order), then campaign
    pub by_category: Vec<CategoryGroup>,
}

impl CampaignReport {
    /// Number of problem links.
    pub fn total_issues(&self) -> usize {
        self.campaigns.iter().map(|c| c.issues.len()).sum()
    }

    /// Number of campaigns whose links could not be listed.
    pub fn listing_failures(&self) -> usize {
        self.campaigns
            .iter()
            .filter(|c| c.listing_error.is_some())
            .count()
    }

    /// True when there is nothing to report.
    pub fn is_healthy(&self) -> bool {
        self.total_issues() == 0 && self.listing_failures() == 0
    }

    /// Number of issues in `category`.
    pub fn count_in(&self, category: IssueCategory) -> usize {
        self.by_category
            .iter()
            .filter(|g| g.category == category)
            .flat_map(|g| g.entities.iter())
            .map(|e| e.issues.len())
            .sum()
    }
}

#[derive(Debug, Default)]
struct AggregatorState {
    order: Vec<i64>,
    names: HashMap<i64, String>,
    issues: Vec<Issue>,
    listing_errors: HashMap<i64, String>,
    finalized: Option<CampaignReport>,
}

impl AggregatorState {
    fn register(&mut self, entity_id: i64, entity_name: &str) {
        match self.names.get_mut(&entity_id) {
            Some(name) => {
                if name.is_empty() && !entity_name.is_empty() {
                    *name = entity_name.to_string();
                }
            }
            None => {
                self.order.push(entity_id);
                self.names.insert(entity_id, entity_name.to_string());
            }
        }
    }

    fn build(&self) -> CampaignReport {
        let mut per_entity: HashMap<i64, Vec<Issue>> = HashMap::new();
        for issue in &self.issues {
            per_entity
                .entry(issue.entity_id)
                .or_default()
                .push(issue.clone());
        }
        for issues in per_entity.values_mut() {
            issues.sort_by(|a, b| {
                (a.sub_entity_id, a.url.as_str()).cmp(&(b.sub_entity_id, b.url.as_str()))
            });
        }

        let name_of = |id: i64| self.names.get(&id).cloned().unwrap_or_default();

        let campaigns: Vec<CampaignSection> = self
            .order
            .iter()
            .map(|&id| CampaignSection {
                entity_id: id,
                entity_name: name_of(id),
                issues: per_entity.get(&id).cloned().unwrap_or_default(),
                listing_error: self.listing_errors.get(&id).cloned(),
            })
            .collect();

        let mut grouped: BTreeMap<IssueCategory, Vec<EntityIssues>> = BTreeMap::new();
        for section in &campaigns {
            let mut by_category: BTreeMap<IssueCategory, Vec<Issue>> = BTreeMap::new();
            for issue in &section.issues {
                if let Some(category) = issue.classification.category() {
                    by_category.entry(category).or_default().push(issue.clone());
                }
            }
            for (category, issues) in by_category {
                grouped.entry(category).or_default().push(EntityIssues {
                    entity_id: section.entity_id,
                    entity_name: section.entity_name.clone(),
                    issues,
                });
            }
        }

        CampaignReport {
            campaigns,
            by_category: grouped
                .into_iter()
                .map(|(category, entities)| CategoryGroup { category, entities })
                .collect(),
        }
    }
}

/// Collects non-OK outcomes per campaign.
///
/// Safe to share between tasks. After `finalize` the report is frozen: later records are
/// ignored and every `finalize` call returns the same report.
#[derive(Debug, Default)]
pub struct IssueAggregator {
    state: Mutex<AggregatorState>,
}

impl IssueAggregator {
    /// Creates an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, AggregatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes a campaign known, so it is labelled in the report even without issues.
    pub fn register_entity(&self, entity_id: i64, entity_name: &str) {
        let mut state = self.lock();
        if state.finalized.is_none() {
            state.register(entity_id, entity_name);
        }
    }

    /// Records the outcome of a link. Returns true if an issue was added.
    pub fn record(
        &self,
        entity_id: i64,
        entity_name: &str,
        sub_entity_id: i64,
        url: &str,
        classification: &Classification,
    ) -> bool {
        self.push(entity_id, entity_name, sub_entity_id, url, None, classification)
    }

    /// Records a resolved link, keeping its final URL on the issue.
    pub fn record_resolved(
        &self,
        link: &CandidateLink,
        outcome: &ResolvedOutcome,
        classification: &Classification,
    ) -> bool {
        self.push(
            link.entity_id,
            &link.entity_name,
            link.sub_entity_id,
            &link.raw_url,
            outcome.final_url(),
            classification,
        )
    }

    fn push(
        &self,
        entity_id: i64,
        entity_name: &str,
        sub_entity_id: i64,
        url: &str,
        final_url: Option<&str>,
        classification: &Classification,
    ) -> bool {
        let mut state = self.lock();
        if state.finalized.is_some() {
            warn!("Ignoring outcome of {url} recorded after finalization");
            return false;
        }
        state.register(entity_id, entity_name);
        if classification.is_ok() {
            return false;
        }
        state.issues.push(Issue {
            entity_id,
            sub_entity_id,
            url: url.to_string(),
            final_url: final_url.map(str::to_string),
            classification: classification.clone(),
            description: classification.description(),
        });
        true
    }

    /// Records that a campaign's links could not be listed.
    pub fn record_entity_failure(&self, entity_id: i64, entity_name: &str, message: &str) {
        let mut state = self.lock();
        if state.finalized.is_some() {
            return;
        }
        state.register(entity_id, entity_name);
        state.listing_errors.insert(entity_id, message.to_string());
    }

    /// Freezes the aggregator and returns the report.
    pub fn finalize(&self) -> CampaignReport {
        let mut state = self.lock();
        if let Some(report) = &state.finalized {
            return report.clone();
        }
        let report = state.build();
        state.finalized = Some(report.clone());
        report
    }
}
