//! HTTP inventory client

use crate::candidate::CandidateItem;
use crate::error::InventoryError;
use crate::normalizer::normalize_listings;
use crate::source::{endpoint, Inventory, InventoryQuery};
use async_trait::async_trait;
use pilot_core::Category;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Images requested per room listing
pub const ROOM_IMAGES: u8 = 3;

/// Queries the listing service over HTTP
#[derive(Debug, Clone)]
pub struct HttpInventory {
    client: reqwest::Client,
    base_url: String,
}

impl HttpInventory {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, InventoryError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn query_params(query: &InventoryQuery) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(4);
        if let Some(location) = &query.location {
            params.push(("city_keyword", location.clone()));
        }
        params.push(("max_price", query.max_price.to_string()));
        if let Some(min_rating) = query.min_rating {
            params.push(("min_rating", min_rating.to_string()));
        }
        if query.category == Category::Lodging {
            params.push(("include_images", ROOM_IMAGES.to_string()));
        }
        params
    }
}

#[async_trait]
impl Inventory for HttpInventory {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn search(&self, query: &InventoryQuery) -> Result<Vec<CandidateItem>, InventoryError> {
        let url = format!("{}/{}", self.base_url, endpoint(query.category)?);
        debug!(%url, location = ?query.location, max_price = query.max_price, "querying inventory");

        let response = self
            .client
            .get(&url)
            .query(&Self::query_params(query))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(InventoryError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let values: Vec<Value> = response
            .json()
            .await
            .map_err(|e| InventoryError::Decode(e.to_string()))?;
        Ok(normalize_listings(values))
    }
}
