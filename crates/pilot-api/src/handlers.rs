//! API Handlers
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use pilot_budget::{per_night_ceiling, AllocationMode, BudgetAllocator, BudgetTier};
use pilot_core::{Category, CategoryBudget, ParamSet, PlannerError, StayLength, TripState};
use pilot_inventory::{MatchFilters, RankMode};
use pilot_itinerary::build_report;
use pilot_stages::{plan_trip, PlanInput};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::AppState;

type ApiResult = Result<(StatusCode, Json<Value>), ApiError>;

pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") })),
    )
}

// =============================================================================
// Budget
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocateRequest {
    pub total_budget: u64,
    pub period: StayLength,
    #[serde(default)]
    pub breakdown: Option<CategoryBudget>,
    #[serde(default)]
    pub mode: AllocationMode,
}

pub async fn allocate(
    State(state): State<AppState>,
    Json(req): Json<AllocateRequest>,
) -> ApiResult {
    let mode = state.effective_mode(req.mode);
    let breakdown = req
        .breakdown
        .unwrap_or_else(|| CategoryBudget::even_split(req.period));

    let categories = BudgetAllocator::new(mode)
        .allocate(req.total_budget, &breakdown, req.period)
        .inspect_err(|e| {
            state
                .metrics
                .allocation_failures
                .with_label_values(&[e.code()])
                .inc();
        })?;

    let ceiling = per_night_ceiling(Some(&categories), req.total_budget, req.period);
    let tier = (!req.period.is_day_trip()).then(|| BudgetTier::for_per_night(ceiling));

    Ok((
        StatusCode::OK,
        Json(json!({
            "totalBudget": req.total_budget,
            "period": req.period,
            "mode": mode,
            "categoryBudget": categories,
            "perNightCeiling": ceiling,
            "tier": tier,
            "tierLabel": tier.map(|t| t.label()),
        })),
    ))
}

// =============================================================================
// Matching
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchQuery {
    pub budget: u64,
    pub location: Option<String>,
    pub min_rating: Option<f64>,
    pub nights: Option<u8>,
    #[serde(default)]
    pub order: RankMode,
}

pub async fn match_category(
    State(state): State<AppState>,
    Path(category): Path<Category>,
    Query(query): Query<MatchQuery>,
) -> ApiResult {
    state
        .metrics
        .match_requests
        .with_label_values(&[category.key()])
        .inc();

    let mut filters = MatchFilters::new();
    if let Some(location) = query.location {
        filters = filters.location(location);
    }
    if let Some(min_rating) = query.min_rating {
        filters = filters.min_rating(min_rating);
    }
    if let Some(nights) = query.nights {
        filters = filters.nights(nights);
    }

    let outcome = state
        .matcher
        .match_items(category, query.budget, &filters, query.order)
        .await
        .inspect_err(|e| warn!(%category, error = %e, "match failed"))?;

    if outcome.fallback_used {
        state.metrics.match_fallbacks.inc();
    }
    Ok((StatusCode::OK, Json(json!(outcome))))
}

// =============================================================================
// Planning
// =============================================================================

pub async fn plan(State(state): State<AppState>, Json(mut input): Json<PlanInput>) -> ApiResult {
    input.mode = state.effective_mode(input.mode);

    let outcome = match plan_trip(&input) {
        Ok(outcome) => outcome,
        Err(e) => {
            state.metrics.plans.with_label_values(&["rejected"]).inc();
            if matches!(
                e,
                PlannerError::InvalidBudget(_) | PlannerError::BudgetMismatch { .. }
            ) {
                state
                    .metrics
                    .allocation_failures
                    .with_label_values(&[e.code()])
                    .inc();
            }
            return Err(e.into());
        }
    };
    state.metrics.plans.with_label_values(&["completed"]).inc();

    let params = outcome.state.to_params()?;
    let report = build_report(&outcome.state)?;
    let markdown = state.renderer.render_report(&report)?;
    info!(pipeline = %outcome.pipeline_id, session = %outcome.state.session_id, "plan completed");

    Ok((
        StatusCode::OK,
        Json(json!({
            "pipelineId": outcome.pipeline_id,
            "state": outcome.state,
            "params": params,
            "proofs": outcome.proofs,
            "report": report,
            "markdown": markdown,
        })),
    ))
}

pub async fn itinerary(State(state): State<AppState>, Json(params): Json<ParamSet>) -> ApiResult {
    let trip = TripState::from_params(&params)?;
    let report = build_report(&trip)?;
    let markdown = state.renderer.render_report(&report)?;
    Ok((
        StatusCode::OK,
        Json(json!({ "report": report, "markdown": markdown })),
    ))
}

// =============================================================================
// Metrics
// =============================================================================

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match crate::metrics::encode(state.metrics.registry()) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain")],
            e.to_string(),
        ),
    }
}
