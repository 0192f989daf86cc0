//! Pilot Stages: the planning steps, in the order the user walks through them
//!
//! ```text
//! region → period → companions → style → budget → lodging → dining → sightseeing
//!                                          ↓          ↓         ↓          ↓
//!                                     Allocator   nightly    food       sightseeing
//!                                                 ceiling    ledger     ledger
//! ```
//!
//! Every step is a [`pilot_core::Stage`] holding the user's input for that
//! step. [`plan_trip`] runs them all through a [`PipelineRunner`].

mod budget;
mod picks;
mod profile;

pub use budget::BudgetStage;
pub use picks::{DiningStage, LodgingStage, SightseeingStage};
pub use profile::{CompanionsStage, PeriodStage, RegionStage, StyleStage};

use pilot_budget::{AllocationMode, BudgetAllocator};
use pilot_core::{
    CategoryBudget, LodgingSelection, PipelineRunner, PlannerError, Selection, Stage, StageProof,
    StayLength, TripState,
};
use serde::{Deserialize, Serialize};

/// Everything the user decides, step by step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanInput {
    pub region: String,
    pub period: StayLength,
    #[serde(default)]
    pub companions: Vec<String>,
    #[serde(default)]
    pub style: Vec<String>,
    pub total_budget: u64,
    /// Defaults to the even split for the stay
    #[serde(default)]
    pub breakdown: Option<CategoryBudget>,
    #[serde(default)]
    pub mode: AllocationMode,
    #[serde(default)]
    pub lodging: Option<LodgingSelection>,
    #[serde(default)]
    pub dining: Vec<Selection>,
    #[serde(default)]
    pub attractions: Vec<Selection>,
}

impl PlanInput {
    pub fn new(region: impl Into<String>, period: StayLength, total_budget: u64) -> Self {
        Self {
            region: region.into(),
            period,
            companions: Vec::new(),
            style: Vec::new(),
            total_budget,
            breakdown: None,
            mode: AllocationMode::default(),
            lodging: None,
            dining: Vec::new(),
            attractions: Vec::new(),
        }
    }

    pub fn with_breakdown(mut self, breakdown: CategoryBudget) -> Self {
        self.breakdown = Some(breakdown);
        self
    }

    pub fn with_mode(mut self, mode: AllocationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_lodging(mut self, lodging: LodgingSelection) -> Self {
        self.lodging = Some(lodging);
        self
    }

    pub fn with_dining(mut self, dining: Vec<Selection>) -> Self {
        self.dining = dining;
        self
    }

    pub fn with_attractions(mut self, attractions: Vec<Selection>) -> Self {
        self.attractions = attractions;
        self
    }

    /// The breakdown as given, or the even split for the stay
    pub fn effective_breakdown(&self) -> CategoryBudget {
        self.breakdown
            .unwrap_or_else(|| CategoryBudget::even_split(self.period))
    }
}

/// Final state plus the per-step trace
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanOutcome {
    pub pipeline_id: String,
    pub state: TripState,
    pub proofs: Vec<StageProof>,
}

/// One stage per planning step, fed from `input`
pub fn plan_stages(input: &PlanInput) -> Vec<Box<dyn Stage>> {
    vec![
        Box::new(RegionStage::new(input.region.clone())),
        Box::new(PeriodStage::new(input.period)),
        Box::new(CompanionsStage::new(input.companions.clone())),
        Box::new(StyleStage::new(input.style.clone())),
        Box::new(BudgetStage::new(
            input.total_budget,
            input.effective_breakdown(),
            BudgetAllocator::new(input.mode),
        )),
        Box::new(LodgingStage::new(input.lodging.clone())),
        Box::new(DiningStage::new(input.dining.clone())),
        Box::new(SightseeingStage::new(input.attractions.clone())),
    ]
}

/// Run every planning step from an empty state
pub fn plan_trip(input: &PlanInput) -> Result<PlanOutcome, PlannerError> {
    let runner = PipelineRunner::new(plan_stages(input));
    let (state, proofs) = runner.run(TripState::new())?;
    Ok(PlanOutcome {
        pipeline_id: runner.pipeline_id().to_string(),
        state,
        proofs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_order() {
        let input = PlanInput::new("강릉", StayLength::Nights(2), 200_000);
        let runner = PipelineRunner::new(plan_stages(&input));
        assert_eq!(
            runner.pipeline_id(),
            "region→period→companions→style→budget→lodging→dining→sightseeing"
        );
    }

    #[test]
    fn test_default_breakdown_is_even() {
        let outcome = plan_trip(&PlanInput::new("강릉", StayLength::Nights(2), 200_000)).unwrap();
        assert_eq!(
            outcome.state.category_budget,
            Some(CategoryBudget::new(50_000, 50_000, 50_000, 50_000))
        );
        assert_eq!(outcome.proofs.len(), 8);
    }

    #[test]
    fn test_input_from_json() {
        let input: PlanInput = serde_json::from_str(
            r#"{
                "region": "강릉",
                "period": "2박3일",
                "totalBudget": 200000,
                "breakdown": {"lodging": 50, "food": 25, "sightseeing": 15, "other": 10},
                "dining": [{"id": "r-1", "name": "초당 순두부", "price": 9000}]
            }"#,
        )
        .unwrap();
        assert_eq!(input.period, StayLength::Nights(2));
        assert_eq!(input.mode, AllocationMode::Percentage);
        assert_eq!(input.dining.len(), 1);
    }
}
