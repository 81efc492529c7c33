//! Inventory sources.
//!
//! An inventory source lists the campaigns of an advertising account and the destination
//! URLs of each campaign's ads. Two sources exist: the Yandex Direct API and a JSON Lines
//! file with the same records.

mod direct;
mod file;
mod filter;

use async_trait::async_trait;
use serde::Serialize;

use crate::error_handling::InventoryError;

pub use direct::DirectApiSource;
pub use file::FileSource;
pub use filter::CampaignFilter;

/// A campaign (entity) whose ads are audited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Campaign {
    /// Campaign identifier
    pub id: i64,
    /// Campaign name, possibly empty
    pub name: String,
}

/// A destination URL attached to an ad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateLink {
    /// Campaign identifier
    pub entity_id: i64,
    /// Campaign name
    pub entity_name: String,
    /// Ad identifier
    pub sub_entity_id: i64,
    /// URL as supplied by the source
    pub raw_url: String,
}

/// Source of campaigns and their candidate links.
#[async_trait]
pub trait InventorySource: Send + Sync {
    /// Lists the campaigns to audit.
    async fn campaigns(&self) -> Result<Vec<Campaign>, InventoryError>;

    /// Lists the candidate links of one campaign.
    async fn links(&self, campaign: &Campaign) -> Result<Vec<CandidateLink>, InventoryError>;

    /// Number of links of `campaign`, when known without a request.
    ///
    /// Used to report how many links the campaign filter skipped. Remote sources return
    /// `None` rather than listing the ads of campaigns that will not be audited.
    fn known_link_count(&self, _campaign: &Campaign) -> Option<usize> {
        None
    }
}
