//! Inventory sources: the seam between matching and wherever listings live

use crate::candidate::CandidateItem;
use crate::error::InventoryError;
use async_trait::async_trait;
use pilot_core::Category;
use serde::Serialize;

/// One inventory request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryQuery {
    pub category: Category,
    /// Location keyword, matched against address or name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub max_price: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
}

impl InventoryQuery {
    pub fn new(category: Category, max_price: u64) -> Self {
        Self {
            category,
            location: None,
            max_price,
            min_rating: None,
        }
    }

    /// Blank keywords are treated as absent
    pub fn with_location(mut self, location: Option<&str>) -> Self {
        self.location = location
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string);
        self
    }

    pub fn with_min_rating(mut self, min_rating: Option<f64>) -> Self {
        self.min_rating = min_rating;
        self
    }

    /// Same query without the location keyword
    pub fn broadened(&self) -> Self {
        Self {
            location: None,
            ..self.clone()
        }
    }
}

/// Path segment of the service endpoint for each category
pub fn endpoint(category: Category) -> Result<&'static str, InventoryError> {
    match category {
        Category::Lodging => Ok("rooms"),
        Category::Food => Ok("restaurants"),
        Category::Sightseeing => Ok("attractions"),
        Category::Other => Err(InventoryError::UnsupportedCategory(category)),
    }
}

/// Anything that can answer an [`InventoryQuery`]
#[async_trait]
pub trait Inventory: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    async fn search(&self, query: &InventoryQuery) -> Result<Vec<CandidateItem>, InventoryError>;
}
