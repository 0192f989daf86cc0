//! Budget allocation
//!
//! Turns a total budget plus a per-category breakdown into absolute
//! category amounts, enforcing the sum rule of the chosen mode.

use pilot_core::{Category, CategoryBudget, PlannerError, StayLength};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Allowed gap between the absolute breakdown sum and the total
pub const ABSOLUTE_TOLERANCE: u64 = 100;

/// How the breakdown values are read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AllocationMode {
    /// Each category holds an integer percent; active categories sum to 100
    #[default]
    Percentage,
    /// Each category holds a currency amount; the sum matches the total within `tolerance`
    Absolute {
        #[serde(default = "default_tolerance")]
        tolerance: u64,
    },
}

fn default_tolerance() -> u64 {
    ABSOLUTE_TOLERANCE
}

/// Validates and converts budget breakdowns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BudgetAllocator {
    mode: AllocationMode,
}

impl BudgetAllocator {
    pub fn new(mode: AllocationMode) -> Self {
        Self { mode }
    }

    pub fn percentage() -> Self {
        Self::new(AllocationMode::Percentage)
    }

    pub fn absolute() -> Self {
        Self::new(AllocationMode::Absolute {
            tolerance: ABSOLUTE_TOLERANCE,
        })
    }

    pub fn absolute_with_tolerance(tolerance: u64) -> Self {
        Self::new(AllocationMode::Absolute { tolerance })
    }

    pub fn mode(&self) -> AllocationMode {
        self.mode
    }

    /// Compute category amounts for `total`.
    ///
    /// On a day trip the lodging entry is forced to 0 before any check.
    pub fn allocate(
        &self,
        total: u64,
        breakdown: &CategoryBudget,
        stay: StayLength,
    ) -> Result<CategoryBudget, PlannerError> {
        if total == 0 {
            return Err(PlannerError::InvalidBudget(
                "total budget must be a positive amount".to_string(),
            ));
        }

        let breakdown = if stay.is_day_trip() {
            breakdown.with(Category::Lodging, 0)
        } else {
            *breakdown
        };

        let result = match self.mode {
            AllocationMode::Percentage => allocate_percentage(total, &breakdown),
            AllocationMode::Absolute { tolerance } => allocate_absolute(total, &breakdown, tolerance),
        };

        if let Err(e) = &result {
            debug!(total, mode = ?self.mode, error = %e, "allocation rejected");
        }
        result
    }
}

fn checked_breakdown_sum(breakdown: &CategoryBudget) -> Result<u64, PlannerError> {
    breakdown.checked_sum().ok_or_else(|| {
        PlannerError::InvalidBudget("breakdown values are too large to add up".to_string())
    })
}

fn allocate_percentage(total: u64, percents: &CategoryBudget) -> Result<CategoryBudget, PlannerError> {
    let sum = checked_breakdown_sum(percents)?;
    if sum != 100 {
        return Err(PlannerError::BudgetMismatch {
            expected: 100,
            actual: sum,
            unit: "%",
        });
    }

    let mut allocated = CategoryBudget::default();
    for category in Category::ALL {
        // percent <= 100, so the share never exceeds `total`
        let share = u128::from(percents.get(category)) * u128::from(total) / 100;
        let share = u64::try_from(share).map_err(|_| {
            PlannerError::InvalidBudget(format!("{} share does not fit the total", category))
        })?;
        allocated = allocated.with(category, share);
    }
    Ok(allocated)
}

fn allocate_absolute(
    total: u64,
    amounts: &CategoryBudget,
    tolerance: u64,
) -> Result<CategoryBudget, PlannerError> {
    let sum = checked_breakdown_sum(amounts)?;
    if sum.abs_diff(total) > tolerance {
        return Err(PlannerError::BudgetMismatch {
            expected: total,
            actual: sum,
            unit: "",
        });
    }
    Ok(*amounts)
}
