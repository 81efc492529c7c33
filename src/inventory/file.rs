//! JSON Lines inventory file.
//!
//! One object per line:
//!
//! ```text
//! {"campaign_id": 1, "campaign_name": "Brand", "ad_id": 10, "url": "https://shop.example/"}
//! ```
//!
//! Blank lines and lines starting with `#` are ignored; malformed lines are logged and
//! skipped. Campaigns keep the order in which they first appear.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::warn;
use serde::Deserialize;

use crate::error_handling::InventoryError;

use super::{Campaign, CandidateLink, InventorySource};

#[derive(Debug, Deserialize)]
struct FileRecord {
    campaign_id: i64,
    #[serde(default)]
    campaign_name: String,
    ad_id: i64,
    url: String,
}

/// Inventory read from a JSON Lines file.
///
/// The file is parsed once, on construction.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    campaigns: Vec<Campaign>,
    links: Vec<CandidateLink>,
}

impl FileSource {
    /// Reads and parses `path`.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::Io` if the file cannot be read.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, InventoryError> {
        let path = path.as_ref().to_path_buf();
        let content = tokio::fs::read_to_string(&path).await?;
        Ok(Self::parse(path, &content))
    }

    fn parse(path: PathBuf, content: &str) -> Self {
        let mut campaigns: Vec<Campaign> = Vec::new();
        let mut links = Vec::new();

        for (index, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let record: FileRecord = match serde_json::from_str(trimmed) {
                Ok(record) => record,
                Err(e) => {
                    warn!("Skipping line {} of {}: {e}", index + 1, path.display());
                    continue;
                }
            };

            match campaigns.iter_mut().find(|c| c.id == record.campaign_id) {
                Some(existing) => {
                    if existing.name.is_empty() {
                        existing.name = record.campaign_name.clone();
                    }
                }
                None => campaigns.push(Campaign {
                    id: record.campaign_id,
                    name: record.campaign_name.clone(),
                }),
            }

            links.push(CandidateLink {
                entity_id: record.campaign_id,
                entity_name: record.campaign_name,
                sub_entity_id: record.ad_id,
                raw_url: record.url,
            });
        }

        Self {
            path,
            campaigns,
            links,
        }
    }

    /// Path the inventory was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl InventorySource for FileSource {
    async fn campaigns(&self) -> Result<Vec<Campaign>, InventoryError> {
        Ok(self.campaigns.clone())
    }

    async fn links(&self, campaign: &Campaign) -> Result<Vec<CandidateLink>, InventoryError> {
        Ok(self
            .links
            .iter()
            .filter(|link| link.entity_id == campaign.id)
            .map(|link| CandidateLink {
                entity_name: campaign.name.clone(),
                ..link.clone()
            })
            .collect())
    }

    fn known_link_count(&self, campaign: &Campaign) -> Option<usize> {
        Some(
            self.links
                .iter()
                .filter(|link| link.entity_id == campaign.id)
                .count(),
        )
    }
}
