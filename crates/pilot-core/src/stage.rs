//! Stage Trait: the contract every planning step implements
use crate::error::PlannerError;
use crate::trip_state::TripState;

/// One step of the planning pipeline.
///
/// A stage owns the user's input for that step and turns the prior state
/// into the next one. It may only add fields; the runner rejects any stage
/// that rewrites a field an earlier stage already set.
pub trait Stage: Send + Sync {
    /// Stable stage id (e.g. "budget.allocate.v1")
    fn id(&self) -> &'static str;

    /// Whether the same prior state always yields the same output (default: true)
    fn deterministic(&self) -> bool {
        true
    }

    /// Produce the next state
    fn apply(&self, state: &TripState) -> Result<TripState, PlannerError>;
}
