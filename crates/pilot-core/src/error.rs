//! Unified Error Model
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlannerError {
    #[error("BUDGET/INVALID: {0}")]
    InvalidBudget(String),

    #[error("BUDGET/MISMATCH: breakdown sums to {actual}{unit}, expected {expected}{unit}")]
    BudgetMismatch {
        expected: u64,
        actual: u64,
        unit: &'static str,
    },

    #[error("LEDGER/OVERSPEND: selecting would bring spend to {attempted}, ceiling is {ceiling}")]
    OverspendRejected { attempted: u64, ceiling: u64 },

    #[error("INVENTORY/UNAVAILABLE: {0}")]
    InventoryUnavailable(String),

    #[error("STATE/INVALID: {0}")]
    InvalidState(String),

    #[error("STATE/RETROACTIVE: stage {stage} changed previously set field `{field}`")]
    RetroactiveMutation { stage: String, field: String },
}

impl PlannerError {
    /// Stable identifier used in API error bodies
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidBudget(_) => "INVALID_BUDGET",
            Self::BudgetMismatch { .. } => "BUDGET_MISMATCH",
            Self::OverspendRejected { .. } => "OVERSPEND_REJECTED",
            Self::InventoryUnavailable(_) => "INVENTORY_UNAVAILABLE",
            Self::InvalidState(_) => "INVALID_STATE",
            Self::RetroactiveMutation { .. } => "RETROACTIVE_MUTATION",
        }
    }

    /// Whether the user can fix this by changing their input
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            Self::InvalidBudget(_) | Self::BudgetMismatch { .. } | Self::OverspendRejected { .. }
        )
    }
}
