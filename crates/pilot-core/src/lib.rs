//! BudgetPilot Core: Trip State, Stage Trait, Runner
//!
//! The planning pipeline threads one [`TripState`] forward through a fixed
//! sequence of steps. Each step reads the fields it needs and returns a new
//! state with its own fields added; nothing already set is touched again.
//!
//! ```text
//! region → period → companions → style → budget → lodging → dining → sightseeing
//!    ↓        ↓          ↓          ↓        ↓         ↓         ↓          ↓
//!                         TripState (forward only)
//! ```

pub mod data_model;
pub mod error;
pub mod params;
pub mod runner;
pub mod stage;
pub mod trip_state;

pub use data_model::{Category, CategoryBudget, LodgingSelection, Selection, StageProof, StayLength};
pub use error::PlannerError;
pub use params::ParamSet;
pub use runner::PipelineRunner;
pub use stage::Stage;
pub use trip_state::TripState;

/// Engine version reported by the API
pub const PILOT_VERSION: &str = "1.0.0";
