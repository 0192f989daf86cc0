//! Listing normalization.
//!
//! The inventory service returns two record shapes:
//! - rooms: `room_id`, `title`, `daily_price`, `rating_star_score`, `address`
//! - restaurants and attractions: `id`, `name`, `price`, `rating`, `location`, `type`
//!
//! Both are folded into [`CandidateItem`]. Records without an id are dropped.

use crate::candidate::CandidateItem;
use crate::error::InventoryError;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::debug;

pub const UNNAMED: &str = "(unnamed)";

/// One listing as the service sends it
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawListing {
    #[serde(default, alias = "room_id")]
    pub id: Option<Value>,
    #[serde(default, alias = "title")]
    pub name: Option<String>,
    #[serde(default, alias = "daily_price", alias = "price_per_night")]
    pub price: Option<f64>,
    #[serde(default, alias = "rating_star_score")]
    pub rating: Option<f64>,
    #[serde(default, alias = "address")]
    pub location: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
}

impl RawListing {
    /// Fold into a candidate; `None` when the record carries no usable id
    pub fn normalize(self) -> Option<CandidateItem> {
        let id = match self.id? {
            Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };

        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNNAMED.to_string());

        let price = self
            .price
            .filter(|p| p.is_finite() && *p > 0.0)
            .map(|p| p.round() as u64)
            .unwrap_or(0);

        let rating = self.rating.filter(|r| r.is_finite()).unwrap_or(0.0);

        let tags: BTreeSet<String> = self
            .kind
            .into_iter()
            .chain(self.amenities)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        let mut item = CandidateItem::new(id, name, price, rating)
            .with_location(self.location.unwrap_or_default().trim());
        item.tags = tags;
        Some(item)
    }
}

/// Normalize a JSON array of listings, skipping records that do not fit
pub fn normalize_listings(values: Vec<Value>) -> Vec<CandidateItem> {
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<RawListing>(value) {
            Ok(raw) => raw.normalize(),
            Err(e) => {
                debug!(error = %e, "skipping malformed listing");
                None
            }
        })
        .collect()
}

/// Parse a JSON document holding an array of listings
pub fn parse_listings(body: &str) -> Result<Vec<CandidateItem>, InventoryError> {
    let values: Vec<Value> =
        serde_json::from_str(body).map_err(|e| InventoryError::Decode(e.to_string()))?;
    Ok(normalize_listings(values))
}
