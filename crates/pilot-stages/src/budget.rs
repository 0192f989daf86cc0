use pilot_budget::BudgetAllocator;
use pilot_core::{CategoryBudget, PlannerError, Stage, TripState};
use tracing::info;

/// Turns the user's total and breakdown into category amounts
pub struct BudgetStage {
    total: u64,
    breakdown: CategoryBudget,
    allocator: BudgetAllocator,
}

impl BudgetStage {
    pub fn new(total: u64, breakdown: CategoryBudget, allocator: BudgetAllocator) -> Self {
        Self {
            total,
            breakdown,
            allocator,
        }
    }
}

impl Stage for BudgetStage {
    fn id(&self) -> &'static str {
        "budget.allocate.v1"
    }

    fn apply(&self, state: &TripState) -> Result<TripState, PlannerError> {
        let stay = state.require_stay_length()?;
        let categories = self.allocator.allocate(self.total, &self.breakdown, stay)?;

        info!(
            session = %state.session_id,
            total = self.total,
            lodging = categories.lodging,
            food = categories.food,
            sightseeing = categories.sightseeing,
            other = categories.other,
            "budget allocated"
        );
        Ok(state.clone().with_budget(self.total, categories))
    }
}
