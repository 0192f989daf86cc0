//! Inventory matching: budget-bounded search, fallback, scoring and ranking

use crate::candidate::{CandidateItem, RankedCandidate};
use crate::error::InventoryError;
use crate::source::{Inventory, InventoryQuery};
use pilot_budget::BudgetTier;
use pilot_core::{Category, PlannerError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 6;

/// Result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RankMode {
    /// Best value first, truncated to the recommendation limit
    #[default]
    Recommend,
    /// Cheapest first, every match
    Search,
}

/// Optional narrowing of a match request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchFilters {
    pub location: Option<String>,
    pub min_rating: Option<f64>,
    pub nights: Option<u8>,
}

impl MatchFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = Some(min_rating);
        self
    }

    pub fn nights(mut self, nights: u8) -> Self {
        self.nights = Some(nights);
        self
    }
}

/// Ranked candidates plus what the user should be told about them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchOutcome {
    pub category: Category,
    pub budget_ceiling: u64,
    pub candidates: Vec<RankedCandidate>,
    pub message: String,
    pub fallback_used: bool,
    /// Matches before truncation
    pub total_found: usize,
    /// Lodging only: `budgetCeiling * nights`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stay_budget: Option<u64>,
}

impl MatchOutcome {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Finds and ranks candidates that fit a per-unit budget ceiling
#[derive(Clone)]
pub struct InventoryMatcher {
    inventory: Arc<dyn Inventory>,
    limit: usize,
}

impl InventoryMatcher {
    pub fn new(inventory: Arc<dyn Inventory>) -> Self {
        Self {
            inventory,
            limit: DEFAULT_RECOMMENDATION_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Match `category` against a per-unit ceiling.
    ///
    /// A zero ceiling or an empty result is not an error: the outcome
    /// carries an explanatory message instead. The inventory is asked at
    /// most twice; the second request drops the location keyword and runs
    /// when the first one fails or finds nothing in that location.
    pub async fn match_items(
        &self,
        category: Category,
        budget_ceiling: u64,
        filters: &MatchFilters,
        mode: RankMode,
    ) -> Result<MatchOutcome, PlannerError> {
        if category == Category::Other {
            return Err(InventoryError::UnsupportedCategory(category).into());
        }

        let nights = filters.nights.unwrap_or(0);
        let stay_budget = (category == Category::Lodging)
            .then(|| budget_ceiling.saturating_mul(u64::from(nights.max(1))));

        if budget_ceiling == 0 {
            return Ok(MatchOutcome {
                category,
                budget_ceiling,
                candidates: Vec::new(),
                message: format!("No {} budget has been set, so there is nothing to match against", category),
                fallback_used: false,
                total_found: 0,
                stay_budget,
            });
        }

        let query = InventoryQuery::new(category, budget_ceiling)
            .with_location(filters.location.as_deref())
            .with_min_rating(filters.min_rating);

        let (items, fallback_used) = match self.inventory.search(&query).await {
            Ok(items) if !items.is_empty() || query.location.is_none() => (items, false),
            Ok(_) => {
                warn!(%category, location = ?query.location, "nothing found in location, broadening search");
                (self.broadened_search(&query).await?, true)
            }
            Err(e) if !e.is_retryable() => return Err(e.into()),
            Err(e) => {
                warn!(
                    inventory = self.inventory.name(),
                    %category,
                    error = %e,
                    "inventory request failed, retrying without location"
                );
                (self.broadened_search(&query).await?, true)
            }
        };

        let mut ranked: Vec<RankedCandidate> = items
            .into_iter()
            .filter(|item| item.price_per_unit <= budget_ceiling)
            .filter(|item| filters.min_rating.map_or(true, |min| item.rating >= min))
            .map(|item| RankedCandidate::annotate(item, nights))
            .collect();

        match mode {
            RankMode::Recommend => ranked.sort_by(|a, b| {
                b.value_score
                    .total_cmp(&a.value_score)
                    .then_with(|| a.id().cmp(b.id()))
            }),
            RankMode::Search => ranked.sort_by(|a, b| {
                a.item
                    .price_per_unit
                    .cmp(&b.item.price_per_unit)
                    .then_with(|| a.id().cmp(b.id()))
            }),
        }

        let total_found = ranked.len();
        if mode == RankMode::Recommend {
            ranked.truncate(self.limit);
        }

        let mut message = outcome_message(category, budget_ceiling, total_found);
        if fallback_used && total_found > 0 {
            if let Some(location) = &query.location {
                message = format!("{} (searched beyond {})", message, location);
            }
        }
        debug!(%category, total_found, returned = ranked.len(), fallback_used, "match complete");
        if total_found == 0 {
            info!(%category, budget_ceiling, "no candidates within budget");
        }

        Ok(MatchOutcome {
            category,
            budget_ceiling,
            candidates: ranked,
            message,
            fallback_used,
            total_found,
            stay_budget,
        })
    }

    async fn broadened_search(&self, query: &InventoryQuery) -> Result<Vec<CandidateItem>, PlannerError> {
        self.inventory.search(&query.broadened()).await.map_err(|e| {
            warn!(inventory = self.inventory.name(), error = %e, "broadened request failed");
            PlannerError::from(e)
        })
    }
}

fn outcome_message(category: Category, budget_ceiling: u64, found: usize) -> String {
    match (category, found) {
        (Category::Lodging, 0) => {
            "No stays fit this budget. Try adjusting the budget.".to_string()
        }
        (Category::Lodging, n) => BudgetTier::for_per_night(budget_ceiling).recommendation_message(n),
        (_, 0) => format!("No {} options fit this budget. Try adjusting the budget.", category),
        (_, n) => format!("{} {} options found", n, category),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::StaticInventory;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn rooms() -> Vec<CandidateItem> {
        vec![
            CandidateItem::new("1", "강릉 바다뷰 게스트하우스", 45_000, 4.5).with_location("강릉시 강동면"),
            CandidateItem::new("2", "강릉 커피거리 펜션", 48_000, 4.3).with_location("강릉시 옥계면"),
            CandidateItem::new("3", "Seomyeon Hotel", 40_000, 4.0).with_location("부산 부산진구"),
            CandidateItem::new("4", "경포 호텔", 90_000, 4.9).with_location("강릉시 경포"),
        ]
    }

    fn matcher() -> InventoryMatcher {
        InventoryMatcher::new(Arc::new(
            StaticInventory::new().with_listings(Category::Lodging, rooms()),
        ))
    }

    /// Fails the first `failures` requests, then answers from the wrapped inventory
    struct Flaky {
        inner: StaticInventory,
        failures: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Inventory for Flaky {
        fn name(&self) -> &'static str {
            "flaky"
        }

        async fn search(&self, query: &InventoryQuery) -> Result<Vec<CandidateItem>, InventoryError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(InventoryError::Status {
                    status: 503,
                    url: "http://inventory/rooms".to_string(),
                });
            }
            self.inner.search(query).await
        }
    }

    #[tokio::test]
    async fn test_recommend_orders_by_value() {
        let outcome = matcher()
            .match_items(
                Category::Lodging,
                50_000,
                &MatchFilters::new().location("강릉").nights(2),
                RankMode::Recommend,
            )
            .await
            .unwrap();

        let ids: Vec<_> = outcome.candidates.iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert!(!outcome.fallback_used);
        assert_eq!(outcome.stay_budget, Some(100_000));
        assert_eq!(outcome.candidates[0].total_price, 90_000);
        assert_eq!(outcome.message, "2 budget-friendly stays found");
    }

    #[tokio::test]
    async fn test_search_orders_by_price() {
        let outcome = matcher()
            .match_items(Category::Lodging, 100_000, &MatchFilters::new(), RankMode::Search)
            .await
            .unwrap();
        let ids: Vec<_> = outcome.candidates.iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["3", "1", "2", "4"]);
    }

    #[tokio::test]
    async fn test_empty_location_falls_back() {
        let outcome = matcher()
            .match_items(
                Category::Lodging,
                50_000,
                &MatchFilters::new().location("제주"),
                RankMode::Recommend,
            )
            .await
            .unwrap();
        assert!(outcome.fallback_used);
        assert_eq!(outcome.total_found, 3);
        assert_eq!(
            outcome.message,
            "3 budget-friendly stays found (searched beyond 제주)"
        );
    }

    #[tokio::test]
    async fn test_huge_ceiling_saturates_totals() {
        let outcome = matcher()
            .match_items(
                Category::Lodging,
                u64::MAX / 2,
                &MatchFilters::new().nights(3),
                RankMode::Search,
            )
            .await
            .unwrap();
        assert_eq!(outcome.stay_budget, Some(u64::MAX));
        assert_eq!(outcome.total_found, 4);
        assert_eq!(outcome.candidates[0].total_price, 120_000);
    }

    #[tokio::test]
    async fn test_zero_ceiling_is_a_message() {
        let outcome = matcher()
            .match_items(Category::Lodging, 0, &MatchFilters::new(), RankMode::Recommend)
            .await
            .unwrap();
        assert!(outcome.is_empty());
        assert!(outcome.message.contains("No lodging budget"));
    }

    #[tokio::test]
    async fn test_nothing_under_ceiling_is_a_message() {
        let outcome = matcher()
            .match_items(
                Category::Lodging,
                10_000,
                &MatchFilters::new().location("강릉"),
                RankMode::Recommend,
            )
            .await
            .unwrap();
        assert!(outcome.is_empty());
        assert!(outcome.fallback_used);
        assert_eq!(outcome.message, "No stays fit this budget. Try adjusting the budget.");
    }

    #[tokio::test]
    async fn test_limit_truncates_recommendations_only() {
        let matcher = matcher().with_limit(2);
        let outcome = matcher
            .match_items(Category::Lodging, 100_000, &MatchFilters::new(), RankMode::Recommend)
            .await
            .unwrap();
        assert_eq!(outcome.candidates.len(), 2);
        assert_eq!(outcome.total_found, 4);

        let outcome = matcher
            .match_items(Category::Lodging, 100_000, &MatchFilters::new(), RankMode::Search)
            .await
            .unwrap();
        assert_eq!(outcome.candidates.len(), 4);
    }

    #[tokio::test]
    async fn test_error_triggers_one_retry() {
        let flaky = Arc::new(Flaky {
            inner: StaticInventory::new().with_listings(Category::Lodging, rooms()),
            failures: 1,
            calls: AtomicUsize::new(0),
        });
        let outcome = InventoryMatcher::new(flaky.clone())
            .match_items(
                Category::Lodging,
                50_000,
                &MatchFilters::new().location("강릉"),
                RankMode::Recommend,
            )
            .await
            .unwrap();
        assert!(outcome.fallback_used);
        assert_eq!(outcome.total_found, 3);
        assert_eq!(flaky.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_second_failure_is_unavailable() {
        let flaky = Arc::new(Flaky {
            inner: StaticInventory::new(),
            failures: 5,
            calls: AtomicUsize::new(0),
        });
        let err = InventoryMatcher::new(flaky.clone())
            .match_items(Category::Food, 20_000, &MatchFilters::new(), RankMode::Recommend)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INVENTORY_UNAVAILABLE");
        assert_eq!(flaky.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_other_category_is_rejected() {
        let err = matcher()
            .match_items(Category::Other, 20_000, &MatchFilters::new(), RankMode::Recommend)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_STATE");
    }

    #[tokio::test]
    async fn test_ties_break_on_id() {
        let inventory = StaticInventory::new().with_listings(
            Category::Food,
            vec![
                CandidateItem::new("b", "Twin B", 10_000, 4.0),
                CandidateItem::new("a", "Twin A", 10_000, 4.0),
            ],
        );
        let outcome = InventoryMatcher::new(Arc::new(inventory))
            .match_items(Category::Food, 10_000, &MatchFilters::new(), RankMode::Recommend)
            .await
            .unwrap();
        assert_eq!(outcome.candidates[0].id(), "a");
        assert_eq!(outcome.message, "2 food options found");
    }
}
