//! Candidate items as the inventory supplies them, plus ranking annotations

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Prices are divided by this before scoring (score per 10,000 won)
pub const SCORE_PRICE_UNIT: f64 = 10_000.0;

/// A lodging, dining or sightseeing option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateItem {
    pub id: String,
    pub name: String,
    /// Per night for lodging, per visit otherwise
    pub price_per_unit: u64,
    /// 0.0 ..= 5.0
    pub rating: f64,
    #[serde(default)]
    pub location: String,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
}

impl CandidateItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price_per_unit: u64, rating: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price_per_unit,
            rating: rating.clamp(0.0, 5.0),
            location: String::new(),
            tags: BTreeSet::new(),
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Rating per 10,000 of price. A free item scores as if it cost 1.
    pub fn value_score(&self) -> f64 {
        let price = self.price_per_unit.max(1) as f64;
        self.rating / (price / SCORE_PRICE_UNIT)
    }

    /// Case-insensitive keyword match on location or name
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let keyword = keyword.trim().to_lowercase();
        keyword.is_empty()
            || self.location.to_lowercase().contains(&keyword)
            || self.name.to_lowercase().contains(&keyword)
    }
}

/// A candidate annotated for presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCandidate {
    #[serde(flatten)]
    pub item: CandidateItem,
    /// `pricePerUnit * max(nights, 1)`, saturating
    pub total_price: u64,
    pub value_score: f64,
}

impl RankedCandidate {
    pub fn annotate(item: CandidateItem, nights: u8) -> Self {
        let total_price = item
            .price_per_unit
            .saturating_mul(u64::from(nights.max(1)));
        let value_score = item.value_score();
        Self {
            item,
            total_price,
            value_score,
        }
    }

    pub fn id(&self) -> &str {
        &self.item.id
    }
}
