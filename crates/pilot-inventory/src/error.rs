//! Inventory error types

use pilot_core::{Category, PlannerError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} answered {status}")]
    Status { status: u16, url: String },

    #[error("cannot read listings: {0}")]
    Decode(String),

    #[error("no inventory serves the '{0}' category")]
    UnsupportedCategory(Category),
}

impl InventoryError {
    /// Whether a broadened retry could succeed
    pub fn is_retryable(&self) -> bool {
        !matches!(self, InventoryError::UnsupportedCategory(_))
    }
}

impl From<InventoryError> for PlannerError {
    fn from(e: InventoryError) -> Self {
        match e {
            InventoryError::UnsupportedCategory(_) => PlannerError::InvalidState(e.to_string()),
            other => PlannerError::InventoryUnavailable(other.to_string()),
        }
    }
}
