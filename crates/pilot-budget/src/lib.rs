//! Pilot Budget: allocation, spend ledgers and lodging tiers
//!
//! ```text
//! totalBudget + breakdown ──► BudgetAllocator ──► CategoryBudget
//!                                                     │
//!                    ┌────────────────────────────────┼─────────────────┐
//!                    ▼                                ▼                 ▼
//!           per_night_ceiling                 SelectionLedger    SelectionLedger
//!             (lodging)                          (food)           (sightseeing)
//! ```
//!
//! # Example
//!
//! ```
//! use pilot_budget::{BudgetAllocator, SelectionLedger};
//! use pilot_core::{Category, CategoryBudget, Selection, StayLength};
//!
//! let budget = BudgetAllocator::percentage()
//!     .allocate(200_000, &CategoryBudget::new(25, 25, 25, 25), StayLength::Nights(2))
//!     .unwrap();
//! assert_eq!(budget.food, 50_000);
//!
//! let mut dining = SelectionLedger::for_category(Category::Food, &budget);
//! assert!(dining.toggle(Selection::new("r-1", "Makguksu", 30_000)).accepted);
//! assert!(!dining.toggle(Selection::new("r-2", "Hanwoo", 25_000)).accepted);
//! ```

pub mod allocator;
pub mod ledger;
pub mod tier;

pub use allocator::{AllocationMode, BudgetAllocator, ABSOLUTE_TOLERANCE};
pub use ledger::{Rejection, SelectionLedger, ToggleOutcome};
pub use tier::{per_night_ceiling, BudgetTier};
