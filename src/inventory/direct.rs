//! Yandex Direct API v5 source.
//!
//! Active campaigns come from `campaigns.get` (state ON, status ACCEPTED); ads come from
//! `ads.get`, paginated with `Page { Limit, Offset }` until the response stops carrying
//! `LimitedBy`.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::ADS_PAGE_LIMIT;
use crate::error_handling::{get_retry_strategy, is_retriable_inventory_error, InventoryError};

use super::{Campaign, CandidateLink, InventorySource};

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    result: Option<T>,
    error: Option<ApiErrorPayload>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorPayload {
    #[serde(default)]
    error_code: i64,
    #[serde(default)]
    error_string: String,
    #[serde(default)]
    error_detail: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CampaignsResult {
    #[serde(default)]
    campaigns: Vec<ApiCampaign>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ApiCampaign {
    id: i64,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AdsResult {
    #[serde(default)]
    ads: Vec<ApiAd>,
    limited_by: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ApiAd {
    id: i64,
    text_ad: Option<AdHref>,
    dynamic_text_ad: Option<AdHref>,
    text_ad_builder_ad: Option<AdHref>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AdHref {
    href: Option<String>,
}

impl ApiAd {
    /// Destination URLs in `TextAd`, `DynamicTextAd`, `TextAdBuilderAd` order.
    fn hrefs(&self) -> impl Iterator<Item = &str> {
        [&self.text_ad, &self.dynamic_text_ad, &self.text_ad_builder_ad]
            .into_iter()
            .flatten()
            .filter_map(|sub| sub.href.as_deref())
            .filter(|href| !href.trim().is_empty())
    }
}

/// Yandex Direct API client.
pub struct DirectApiSource {
    client: Arc<reqwest::Client>,
    api_url: String,
    token: String,
    client_login: String,
    language: String,
}

impl DirectApiSource {
    /// Creates a source for the account `client_login`.
    pub fn new(
        client: Arc<reqwest::Client>,
        api_url: impl Into<String>,
        token: impl Into<String>,
        client_login: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            token: token.into(),
            client_login: client_login.into(),
            language: language.into(),
        }
    }

    /// Calls `service` with method `get`, retrying transient failures.
    async fn call<T>(&self, service: &str, params: &Value) -> Result<T, InventoryError>
    where
        T: DeserializeOwned + Default,
    {
        tokio_retry::RetryIf::spawn(
            get_retry_strategy(),
            || self.call_once(service, params),
            |e: &InventoryError| {
                let retry = is_retriable_inventory_error(e);
                if retry {
                    warn!("Direct API {service} call failed, retrying: {e}");
                }
                retry
            },
        )
        .await
    }

    async fn call_once<T>(&self, service: &str, params: &Value) -> Result<T, InventoryError>
    where
        T: DeserializeOwned + Default,
    {
        let url = format!("{}/{}", self.api_url.trim_end_matches('/'), service);
        debug!("POST {url}");
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header("Client-Login", &self.client_login)
            .header(reqwest::header::ACCEPT_LANGUAGE, &self.language)
            .json(&json!({ "method": "get", "params": params }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(InventoryError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let envelope: ApiEnvelope<T> = serde_json::from_slice(&body)?;
        if let Some(error) = envelope.error {
            let detail = if error.error_detail.is_empty() {
                error.error_string
            } else {
                error.error_detail
            };
            return Err(InventoryError::Api {
                code: error.error_code,
                detail,
            });
        }
        Ok(envelope.result.unwrap_or_default())
    }
}

#[async_trait]
impl InventorySource for DirectApiSource {
    async fn campaigns(&self) -> Result<Vec<Campaign>, InventoryError> {
        let params = json!({
            "SelectionCriteria": { "States": ["ON"], "Statuses": ["ACCEPTED"] },
            "FieldNames": ["Id", "Name", "State", "Status"],
        });
        let result: CampaignsResult = self.call("campaigns", &params).await?;
        Ok(result
            .campaigns
            .into_iter()
            .map(|c| Campaign {
                id: c.id,
                name: c.name,
            })
            .collect())
    }

    async fn links(&self, campaign: &Campaign) -> Result<Vec<CandidateLink>, InventoryError> {
        let mut links = Vec::new();
        let mut offset: u64 = 0;
        loop {
            let params = json!({
                "SelectionCriteria": { "CampaignIds": [campaign.id] },
                "FieldNames": ["Id", "CampaignId", "State", "Status"],
                "TextAdFieldNames": ["Href", "DisplayUrlPath"],
                "TextAdBuilderAdFieldNames": ["Href"],
                "Page": { "Limit": ADS_PAGE_LIMIT, "Offset": offset },
            });
            let page: AdsResult = self.call("ads", &params).await?;
            for ad in &page.ads {
                links.extend(ad.hrefs().map(|href| CandidateLink {
                    entity_id: campaign.id,
                    entity_name: campaign.name.clone(),
                    sub_entity_id: ad.id,
                    raw_url: href.to_string(),
                }));
            }
            match page.limited_by {
                Some(next) if next > offset => offset = next,
                Some(next) => {
                    warn!("Direct API returned non-advancing LimitedBy {next} for campaign {}", campaign.id);
                    break;
                }
                None => break,
            }
        }
        debug!("Campaign {} has {} link(s)", campaign.id, links.len());
        Ok(links)
    }
}
