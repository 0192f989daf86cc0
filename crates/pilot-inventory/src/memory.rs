//! In-memory inventory, loaded from listing files or built by hand

use crate::candidate::CandidateItem;
use crate::error::InventoryError;
use crate::normalizer::parse_listings;
use crate::source::{endpoint, Inventory, InventoryQuery};
use async_trait::async_trait;
use pilot_core::Category;
use std::collections::HashMap;
use std::path::Path;

/// Fixed listings per category, filtered like the listing service does
#[derive(Debug, Clone, Default)]
pub struct StaticInventory {
    listings: HashMap<Category, Vec<CandidateItem>>,
}

impl StaticInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listings(mut self, category: Category, items: Vec<CandidateItem>) -> Self {
        self.listings.entry(category).or_default().extend(items);
        self
    }

    /// Load raw listings for `category` from a JSON file
    pub fn load_file(self, category: Category, path: impl AsRef<Path>) -> Result<Self, InventoryError> {
        let path = path.as_ref();
        let body = std::fs::read_to_string(path)
            .map_err(|e| InventoryError::Decode(format!("{}: {}", path.display(), e)))?;
        Ok(self.with_listings(category, parse_listings(&body)?))
    }

    /// Load `rooms.json`, `restaurants.json` and `attractions.json` from a directory.
    ///
    /// Missing files leave that category empty.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, InventoryError> {
        let dir = dir.as_ref();
        let mut inventory = Self::new();
        for category in [Category::Lodging, Category::Food, Category::Sightseeing] {
            let path = dir.join(format!("{}.json", endpoint(category)?));
            if path.exists() {
                inventory = inventory.load_file(category, &path)?;
            }
        }
        Ok(inventory)
    }

    pub fn len(&self, category: Category) -> usize {
        self.listings.get(&category).map(Vec::len).unwrap_or(0)
    }
}

#[async_trait]
impl Inventory for StaticInventory {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn search(&self, query: &InventoryQuery) -> Result<Vec<CandidateItem>, InventoryError> {
        endpoint(query.category)?;

        let Some(items) = self.listings.get(&query.category) else {
            return Ok(Vec::new());
        };

        Ok(items
            .iter()
            .filter(|item| {
                query
                    .location
                    .as_deref()
                    .map_or(true, |keyword| item.matches_keyword(keyword))
            })
            .filter(|item| item.price_per_unit <= query.max_price)
            .filter(|item| query.min_rating.map_or(true, |min| item.rating >= min))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inventory() -> StaticInventory {
        StaticInventory::new().with_listings(
            Category::Food,
            vec![
                CandidateItem::new("r-1", "초당 순두부", 9_000, 4.6).with_location("강릉시 초당동"),
                CandidateItem::new("r-2", "Haeundae Grill", 35_000, 4.1).with_location("부산 해운대구"),
                CandidateItem::new("r-3", "강문 횟집", 60_000, 4.8).with_location("강릉시 강문동"),
            ],
        )
    }

    #[tokio::test]
    async fn test_filters_like_the_service() {
        let query = InventoryQuery::new(Category::Food, 50_000).with_location(Some("강릉"));
        let items = inventory().search(&query).await.unwrap();
        let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["r-1"]);
    }

    #[tokio::test]
    async fn test_min_rating() {
        let query = InventoryQuery::new(Category::Food, 50_000).with_min_rating(Some(4.5));
        let items = inventory().search(&query).await.unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_category_is_empty() {
        let query = InventoryQuery::new(Category::Sightseeing, 50_000);
        assert!(inventory().search(&query).await.unwrap().is_empty());

        let query = InventoryQuery::new(Category::Other, 50_000);
        assert!(inventory().search(&query).await.is_err());
    }
}
