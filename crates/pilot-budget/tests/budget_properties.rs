//! Property tests for allocation and spend ledgers.
//!
//! 1. Any toggle sequence keeps `spent` within the ceiling and equal to the selected prices
//! 2. Toggling a new item twice restores the prior state
//! 3. Valid percentage breakdowns allocate within 3 units of the total
//! 4. A day trip always allocates 0 to lodging
//! 5. Arbitrary breakdowns never panic

use pilot_budget::{BudgetAllocator, SelectionLedger};
use pilot_core::{Category, CategoryBudget, PlannerError, Selection, StayLength};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

/// A toggle of one of a few ids, at any price
fn toggle_strategy() -> impl Strategy<Value = Selection> {
    (0u8..8, prop_oneof![0u64..100_000, any::<u64>()])
        .prop_map(|(id, price)| Selection::new(format!("item-{}", id), "Item", price))
}

/// Three percents summing to 100, split at two cut points
fn three_way_split() -> impl Strategy<Value = (u64, u64, u64)> {
    (0u64..=100, 0u64..=100).prop_map(|(a, b)| {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        (low, high - low, 100 - high)
    })
}

fn four_way_split() -> impl Strategy<Value = CategoryBudget> {
    (three_way_split(), 0u64..=100).prop_map(|((a, b, c), cut)| {
        // split the first share again so all four categories get a value
        let first = a.min(cut);
        CategoryBudget::new(first, a - first, b, c)
    })
}

fn selected_total(ledger: &SelectionLedger) -> Option<u64> {
    ledger
        .selections()
        .iter()
        .try_fold(0u64, |acc, s| acc.checked_add(s.price))
}

// ═══════════════════════════════════════════════════════════════════════
// Ledger
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn spent_stays_within_ceiling(
        ceiling in prop_oneof![0u64..200_000, any::<u64>()],
        toggles in prop::collection::vec(toggle_strategy(), 0..40),
    ) {
        let mut ledger = SelectionLedger::new(Category::Food, ceiling);
        for item in toggles {
            let outcome = ledger.toggle(item);
            prop_assert!(ledger.spent() <= ceiling);
            prop_assert_eq!(outcome.new_spent, ledger.spent());
            prop_assert_eq!(selected_total(&ledger), Some(ledger.spent()));
        }
    }

    #[test]
    fn toggling_a_new_item_twice_restores_state(
        ceiling in 0u64..200_000,
        toggles in prop::collection::vec(toggle_strategy(), 0..20),
        price in 0u64..200_000,
    ) {
        let mut ledger = SelectionLedger::new(Category::Sightseeing, ceiling);
        for item in toggles {
            ledger.toggle(item);
        }
        let before = ledger.clone();

        let fresh = Selection::new("fresh", "Fresh", price);
        ledger.toggle(fresh.clone());
        ledger.toggle(fresh);

        prop_assert_eq!(ledger, before);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Allocation
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn percentage_allocation_sums_to_total(
        total in 1u64..=u64::MAX,
        percents in four_way_split(),
        nights in 1u8..=5,
    ) {
        let allocated = BudgetAllocator::percentage()
            .allocate(total, &percents, StayLength::Nights(nights))
            .unwrap();

        let sum = allocated.checked_sum().unwrap();
        prop_assert!(sum <= total);
        prop_assert!(total - sum <= 3);
        for category in Category::ALL {
            prop_assert!(allocated.get(category) <= total);
        }
    }

    #[test]
    fn day_trip_never_funds_lodging(
        total in 1u64..=u64::MAX,
        (food, sightseeing, other) in three_way_split(),
        lodging in any::<u64>(),
    ) {
        let breakdown = CategoryBudget::new(lodging, food, sightseeing, other);
        let allocated = BudgetAllocator::percentage()
            .allocate(total, &breakdown, StayLength::DayTrip)
            .unwrap();
        prop_assert_eq!(allocated.lodging, 0);
        prop_assert!(total - allocated.checked_sum().unwrap() <= 2);
    }

    #[test]
    fn arbitrary_breakdowns_never_panic(
        total in any::<u64>(),
        values in prop::array::uniform4(any::<u64>()),
        tolerance in any::<u64>(),
    ) {
        let breakdown = CategoryBudget::new(values[0], values[1], values[2], values[3]);

        match BudgetAllocator::percentage().allocate(total, &breakdown, StayLength::Nights(1)) {
            Ok(allocated) => {
                prop_assert_eq!(breakdown.checked_sum(), Some(100));
                prop_assert!(allocated.checked_sum().is_some_and(|sum| sum <= total));
            }
            Err(e) => prop_assert!(matches!(
                e,
                PlannerError::InvalidBudget(_) | PlannerError::BudgetMismatch { .. }
            ), "unexpected error: {:?}", e),
        }

        let absolute = BudgetAllocator::absolute_with_tolerance(tolerance)
            .allocate(total, &breakdown, StayLength::Nights(1));
        if let Ok(allocated) = absolute {
            prop_assert_eq!(allocated, breakdown);
            prop_assert!(breakdown.checked_sum().unwrap().abs_diff(total) <= tolerance);
        }
    }
}
