//! HTTP error mapping
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pilot_core::PlannerError;
use pilot_itinerary::ItineraryError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Planner(#[from] PlannerError),

    #[error(transparent)]
    Itinerary(#[from] ItineraryError),

    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Planner(e) => match e {
                PlannerError::InvalidBudget(_)
                | PlannerError::BudgetMismatch { .. }
                | PlannerError::InvalidState(_) => StatusCode::UNPROCESSABLE_ENTITY,
                PlannerError::OverspendRejected { .. } => StatusCode::CONFLICT,
                PlannerError::InventoryUnavailable(_) => StatusCode::BAD_GATEWAY,
                PlannerError::RetroactiveMutation { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Itinerary(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Planner(e) => e.code(),
            Self::Itinerary(_) => "RENDER_FAILED",
            Self::BadRequest(_) => "BAD_REQUEST",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.code(), "{}", self);
        }
        (
            status,
            Json(json!({ "error": self.code(), "message": self.to_string() })),
        )
            .into_response()
    }
}
