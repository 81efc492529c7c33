//! Campaign allow/deny lists.

use std::collections::HashSet;

use super::Campaign;

/// Selects the campaigns to audit.
///
/// A non-empty allow list keeps only the listed ids; the deny list then removes ids.
#[derive(Debug, Clone, Default)]
pub struct CampaignFilter {
    include: HashSet<i64>,
    exclude: HashSet<i64>,
}

impl CampaignFilter {
    /// Creates a filter from allow and deny lists.
    pub fn new(include: &[i64], exclude: &[i64]) -> Self {
        Self {
            include: include.iter().copied().collect(),
            exclude: exclude.iter().copied().collect(),
        }
    }

    /// Returns true if `campaign` is audited.
    pub fn allows(&self, campaign: &Campaign) -> bool {
        (self.include.is_empty() || self.include.contains(&campaign.id))
            && !self.exclude.contains(&campaign.id)
    }

    /// Splits campaigns into (audited, skipped), keeping order.
    pub fn partition(&self, campaigns: Vec<Campaign>) -> (Vec<Campaign>, Vec<Campaign>) {
        campaigns.into_iter().partition(|c| self.allows(c))
    }
}
