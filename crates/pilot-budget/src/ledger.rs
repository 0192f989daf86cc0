//! Selection Ledger: per-category spend tracking under a ceiling
//!
//! Dining and sightseeing each get their own ledger. A toggle either
//! selects or deselects one item; a selection that would push `spent`
//! over the ceiling is refused and leaves the ledger untouched.

use pilot_core::{Category, CategoryBudget, PlannerError, Selection};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Why a selection was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rejection {
    /// Spend the selection would have produced
    pub attempted: u64,
    pub ceiling: u64,
}

impl From<Rejection> for PlannerError {
    fn from(r: Rejection) -> Self {
        PlannerError::OverspendRejected {
            attempted: r.attempted,
            ceiling: r.ceiling,
        }
    }
}

/// Result of one toggle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleOutcome {
    pub accepted: bool,
    pub new_spent: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<Rejection>,
}

impl ToggleOutcome {
    fn accepted(new_spent: u64) -> Self {
        Self {
            accepted: true,
            new_spent,
            rejection: None,
        }
    }

    /// Turn a refused toggle into an error
    pub fn into_result(self) -> Result<u64, PlannerError> {
        match self.rejection {
            Some(rejection) => Err(rejection.into()),
            None => Ok(self.new_spent),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionLedger {
    category: Category,
    budget_ceiling: u64,
    spent: u64,
    selected: Vec<Selection>,
}

impl SelectionLedger {
    pub fn new(category: Category, budget_ceiling: u64) -> Self {
        Self {
            category,
            budget_ceiling,
            spent: 0,
            selected: Vec::new(),
        }
    }

    /// Ledger whose ceiling is the state's budget for `category`
    pub fn for_category(category: Category, budget: &CategoryBudget) -> Self {
        Self::new(category, budget.get(category))
    }

    /// Rebuild a ledger by selecting `items` in order.
    ///
    /// Fails on the first item that would overspend or that repeats an id.
    pub fn replay(
        category: Category,
        budget_ceiling: u64,
        items: &[Selection],
    ) -> Result<Self, PlannerError> {
        let mut ledger = Self::new(category, budget_ceiling);
        for item in items {
            if ledger.is_selected(&item.id) {
                return Err(PlannerError::InvalidState(format!(
                    "{} item '{}' selected twice",
                    category, item.id
                )));
            }
            ledger.toggle(item.clone()).into_result()?;
        }
        Ok(ledger)
    }

    /// Select `item`, or deselect it if its id is already selected.
    ///
    /// Deselection subtracts the price recorded when the item was selected.
    pub fn toggle(&mut self, item: Selection) -> ToggleOutcome {
        if let Some(pos) = self.selected.iter().position(|s| s.id == item.id) {
            let removed = self.selected.remove(pos);
            self.spent -= removed.price;
            return ToggleOutcome::accepted(self.spent);
        }

        let attempted = match self.spent.checked_add(item.price) {
            Some(total) if total <= self.budget_ceiling => total,
            total => {
                let attempted = total.unwrap_or(u64::MAX);
                debug!(
                    category = %self.category,
                    item = %item.id,
                    attempted,
                    ceiling = self.budget_ceiling,
                    "selection rejected"
                );
                return ToggleOutcome {
                    accepted: false,
                    new_spent: self.spent,
                    rejection: Some(Rejection {
                        attempted,
                        ceiling: self.budget_ceiling,
                    }),
                };
            }
        };

        self.spent = attempted;
        self.selected.push(item);
        ToggleOutcome::accepted(self.spent)
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s.id == id)
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn budget_ceiling(&self) -> u64 {
        self.budget_ceiling
    }

    pub fn spent(&self) -> u64 {
        self.spent
    }

    pub fn remaining(&self) -> u64 {
        self.budget_ceiling - self.spent
    }

    /// Selections in the order they were made
    pub fn selections(&self) -> &[Selection] {
        &self.selected
    }

    pub fn into_selections(self) -> Vec<Selection> {
        self.selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price: u64) -> Selection {
        Selection::new(id, format!("Item {}", id), price)
    }

    #[test]
    fn test_second_toggle_over_ceiling_is_rejected() {
        let mut ledger = SelectionLedger::new(Category::Food, 50_000);

        let first = ledger.toggle(item("a", 30_000));
        assert!(first.accepted);
        assert_eq!(first.new_spent, 30_000);

        let second = ledger.toggle(item("b", 25_000));
        assert!(!second.accepted);
        assert_eq!(second.new_spent, 30_000);
        assert_eq!(
            second.rejection,
            Some(Rejection {
                attempted: 55_000,
                ceiling: 50_000
            })
        );
        assert_eq!(ledger.spent(), 30_000);
        assert!(!ledger.is_selected("b"));
    }

    #[test]
    fn test_toggle_twice_restores_spent() {
        let mut ledger = SelectionLedger::new(Category::Sightseeing, 40_000);
        ledger.toggle(item("a", 10_000));
        let before = ledger.spent();

        ledger.toggle(item("b", 15_000));
        let outcome = ledger.toggle(item("b", 15_000));
        assert!(outcome.accepted);
        assert_eq!(ledger.spent(), before);
    }

    #[test]
    fn test_deselect_uses_recorded_price() {
        let mut ledger = SelectionLedger::new(Category::Food, 50_000);
        ledger.toggle(item("a", 20_000));
        // different price on the way out must not corrupt spent
        ledger.toggle(item("a", 5_000));
        assert_eq!(ledger.spent(), 0);
    }

    #[test]
    fn test_exact_ceiling_is_accepted() {
        let mut ledger = SelectionLedger::new(Category::Food, 50_000);
        assert!(ledger.toggle(item("a", 50_000)).accepted);
        assert_eq!(ledger.remaining(), 0);
        assert!(ledger.toggle(item("free", 0)).accepted);
    }

    #[test]
    fn test_overflowing_pick_is_rejected() {
        let mut ledger = SelectionLedger::new(Category::Food, u64::MAX);
        assert!(ledger.toggle(item("a", 10)).accepted);
        let outcome = ledger.toggle(item("b", u64::MAX));
        assert!(!outcome.accepted);
        assert_eq!(outcome.rejection.map(|r| r.attempted), Some(u64::MAX));
        assert_eq!(ledger.spent(), 10);
    }

    #[test]
    fn test_selections_keep_order() {
        let mut ledger = SelectionLedger::new(Category::Food, 100_000);
        ledger.toggle(item("c", 1_000));
        ledger.toggle(item("a", 1_000));
        ledger.toggle(item("b", 1_000));
        ledger.toggle(item("a", 1_000));
        let ids: Vec<_> = ledger.selections().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b"]);
    }

    #[test]
    fn test_rejection_into_error() {
        let mut ledger = SelectionLedger::new(Category::Food, 10_000);
        let err = ledger.toggle(item("a", 12_000)).into_result().unwrap_err();
        assert_eq!(
            err,
            PlannerError::OverspendRejected {
                attempted: 12_000,
                ceiling: 10_000
            }
        );
    }

    #[test]
    fn test_replay() {
        let items = vec![item("a", 20_000), item("b", 20_000)];
        let ledger = SelectionLedger::replay(Category::Food, 50_000, &items).unwrap();
        assert_eq!(ledger.spent(), 40_000);

        let err = SelectionLedger::replay(Category::Food, 30_000, &items).unwrap_err();
        assert_eq!(err.code(), "OVERSPEND_REJECTED");

        let dup = vec![item("a", 1_000), item("a", 1_000)];
        assert!(matches!(
            SelectionLedger::replay(Category::Food, 30_000, &dup),
            Err(PlannerError::InvalidState(_))
        ));
    }
}
