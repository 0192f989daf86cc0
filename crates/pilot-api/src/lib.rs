//! BudgetPilot API /v1: REST endpoints
//!
//! ```text
//! POST /v1/budget/allocate   totalBudget + breakdown ──► category amounts, nightly ceiling
//! GET  /v1/match/{category}  budget + filters        ──► ranked candidates
//! POST /v1/plan              every step's input      ──► state, params, proofs, report
//! POST /v1/itinerary         carried params          ──► report + Markdown
//! GET  /v1/health, /metrics
//! ```
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;

use axum::{
    routing::{get, post},
    Router,
};
use pilot_budget::AllocationMode;
use pilot_inventory::{HttpInventory, Inventory, InventoryError, InventoryMatcher, StaticInventory};
use pilot_itinerary::{ItineraryError, ReportRenderer, TemplateSet};
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;

pub use config::{ApiConfig, ConfigError};
pub use error::ApiError;
pub use metrics::ApiMetrics;

/// Startup failures
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("inventory: {0}")]
    Inventory(#[from] InventoryError),
    #[error("templates: {0}")]
    Templates(#[from] ItineraryError),
    #[error("metrics: {0}")]
    Metrics(#[from] prometheus::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ApiConfig>,
    pub matcher: InventoryMatcher,
    pub renderer: Arc<ReportRenderer<'static>>,
    pub metrics: Arc<ApiMetrics>,
}

impl AppState {
    pub fn new(config: ApiConfig, inventory: Arc<dyn Inventory>) -> Result<Self, ServerError> {
        let templates = match &config.templates_path {
            Some(path) => TemplateSet::load(path)?,
            None => TemplateSet::embedded()?,
        };
        Ok(Self {
            matcher: InventoryMatcher::new(inventory).with_limit(config.recommendation_limit),
            renderer: Arc::new(ReportRenderer::new(templates)?),
            metrics: Arc::new(ApiMetrics::new()?),
            config: Arc::new(config),
        })
    }

    /// Build the inventory the config points at: a fixture directory or the listing service
    pub fn from_config(config: ApiConfig) -> Result<Self, ServerError> {
        let inventory: Arc<dyn Inventory> = match &config.inventory_dir {
            Some(dir) => {
                tracing::info!("Serving listings from {}", dir.display());
                Arc::new(StaticInventory::load_dir(dir)?)
            }
            None => {
                tracing::info!("Listing service at {}", config.inventory_url);
                Arc::new(HttpInventory::new(
                    config.inventory_url.clone(),
                    config.inventory_timeout(),
                )?)
            }
        };
        Self::new(config, inventory)
    }

    /// Absolute breakdowns always use the configured tolerance
    pub fn effective_mode(&self, mode: AllocationMode) -> AllocationMode {
        match mode {
            AllocationMode::Percentage => AllocationMode::Percentage,
            AllocationMode::Absolute { .. } => AllocationMode::Absolute {
                tolerance: self.config.absolute_tolerance,
            },
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/v1/health", get(handlers::health))
        .route("/v1/budget/allocate", post(handlers::allocate))
        .route("/v1/match/{category}", get(handlers::match_category))
        .route("/v1/plan", post(handlers::plan))
        .route("/v1/itinerary", post(handlers::itinerary))
        .route("/metrics", get(handlers::metrics))
        .layer(axum::middleware::from_fn(middleware::request_logging))
        .layer(middleware::cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: ApiConfig) -> Result<(), ServerError> {
    let addr = config.addr.clone();
    let app = create_app(AppState::from_config(config)?);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("BudgetPilot API listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
