//! Lodging, dining and sightseeing picks, each checked against its budget

use pilot_budget::{per_night_ceiling, SelectionLedger};
use pilot_core::{Category, LodgingSelection, PlannerError, Selection, Stage, TripState};
use tracing::debug;

/// The chosen stay, if any
pub struct LodgingStage {
    selection: Option<LodgingSelection>,
}

impl LodgingStage {
    pub fn new(selection: Option<LodgingSelection>) -> Self {
        Self { selection }
    }
}

impl Stage for LodgingStage {
    fn id(&self) -> &'static str {
        "lodging.select.v1"
    }

    fn apply(&self, state: &TripState) -> Result<TripState, PlannerError> {
        let stay = state.require_stay_length()?;
        let Some(selection) = &self.selection else {
            return Ok(state.clone());
        };

        if stay.is_day_trip() {
            return Err(PlannerError::InvalidState(format!(
                "a day trip has no nights to book '{}' for",
                selection.name
            )));
        }

        let budget = state.require_category_budget()?;
        let ceiling = per_night_ceiling(Some(budget), state.total_budget.unwrap_or(0), stay);
        if selection.price_per_night > ceiling {
            return Err(PlannerError::OverspendRejected {
                attempted: selection.price_per_night,
                ceiling,
            });
        }

        debug!(id = %selection.id, price = selection.price_per_night, ceiling, "lodging selected");
        Ok(state.clone().with_lodging(selection.clone()))
    }
}

/// Restaurants, replayed through a food ledger
pub struct DiningStage {
    items: Vec<Selection>,
}

impl DiningStage {
    pub fn new(items: Vec<Selection>) -> Self {
        Self { items }
    }
}

impl Stage for DiningStage {
    fn id(&self) -> &'static str {
        "dining.select.v1"
    }

    fn apply(&self, state: &TripState) -> Result<TripState, PlannerError> {
        let ledger = replay(state, Category::Food, &self.items)?;
        Ok(state.clone().with_dining(ledger.into_selections()))
    }
}

/// Attractions, replayed through a sightseeing ledger
pub struct SightseeingStage {
    items: Vec<Selection>,
}

impl SightseeingStage {
    pub fn new(items: Vec<Selection>) -> Self {
        Self { items }
    }
}

impl Stage for SightseeingStage {
    fn id(&self) -> &'static str {
        "sightseeing.select.v1"
    }

    fn apply(&self, state: &TripState) -> Result<TripState, PlannerError> {
        let ledger = replay(state, Category::Sightseeing, &self.items)?;
        Ok(state.clone().with_attractions(ledger.into_selections()))
    }
}

fn replay(state: &TripState, category: Category, items: &[Selection]) -> Result<SelectionLedger, PlannerError> {
    let budget = state.require_category_budget()?;
    let ledger = SelectionLedger::replay(category, budget.get(category), items)?;
    debug!(%category, spent = ledger.spent(), ceiling = ledger.budget_ceiling(), "selections replayed");
    Ok(ledger)
}
