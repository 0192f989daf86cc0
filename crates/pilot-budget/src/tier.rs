//! Lodging price tiers and the per-night ceiling

use pilot_core::{CategoryBudget, StayLength};
use serde::{Deserialize, Serialize};

/// Price band of a per-night lodging budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetTier {
    /// up to 50,000 per night
    Budget,
    /// up to 100,000 per night
    MidRange,
    /// up to 200,000 per night
    Premium,
    Luxury,
}

impl BudgetTier {
    pub fn for_per_night(amount: u64) -> Self {
        match amount {
            0..=50_000 => BudgetTier::Budget,
            50_001..=100_000 => BudgetTier::MidRange,
            100_001..=200_000 => BudgetTier::Premium,
            _ => BudgetTier::Luxury,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BudgetTier::Budget => "Budget",
            BudgetTier::MidRange => "Mid-range",
            BudgetTier::Premium => "Premium",
            BudgetTier::Luxury => "Luxury",
        }
    }

    /// Headline shown above a list of `count` lodging matches
    pub fn recommendation_message(&self, count: usize) -> String {
        match self {
            BudgetTier::Budget => format!("{} budget-friendly stays found", count),
            BudgetTier::MidRange => format!("{} reasonably priced stays recommended", count),
            BudgetTier::Premium => format!("{} premium stays hand-picked", count),
            BudgetTier::Luxury => format!("{} luxury stays for a special trip", count),
        }
    }
}

impl std::fmt::Display for BudgetTier {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-night lodging ceiling for the matcher.
///
/// Falls back to `total / nights` when no lodging budget was allocated.
/// A day trip has no nights and yields 0.
pub fn per_night_ceiling(categories: Option<&CategoryBudget>, total: u64, stay: StayLength) -> u64 {
    let nights = u64::from(stay.nights());
    if nights == 0 {
        return 0;
    }

    let lodging = categories.map(|c| c.lodging).filter(|amount| *amount > 0);
    let pool = lodging.unwrap_or(total);
    // round half up
    pool / nights + u64::from(pool % nights >= nights - nights / 2)
}
