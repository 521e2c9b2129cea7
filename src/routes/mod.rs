use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    error::{AppError, AppResult},
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{PipelineSettings, ProviderConnector},
};

pub mod playlists;
pub mod recommendations;

/// Shared application state
pub struct AppState {
    /// Opens a catalog session per request
    pub connector: Arc<dyn ProviderConnector>,
    /// Defaults for every pipeline run, overridable per request
    pub settings: PipelineSettings,
}

/// Per-request overrides of the selection rules
#[derive(Debug, Default, Deserialize)]
pub struct SelectionOverrides {
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub per_seed_limit: Option<usize>,
}

impl SelectionOverrides {
    /// Applies the overrides on top of the configured settings
    pub fn apply(&self, defaults: &PipelineSettings) -> AppResult<PipelineSettings> {
        let mut settings = defaults.clone();
        if let Some(threshold) = self.threshold {
            settings.recommender.threshold = threshold;
        }
        if let Some(limit) = self.per_seed_limit {
            settings.recommender.per_seed_limit = limit;
        }
        settings.recommender.validate()?;
        Ok(settings)
    }
}

pub(crate) fn require_non_empty(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidInput(format!("{} cannot be empty", field)));
    }
    Ok(())
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(axum::middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/playlists", post(playlists::create))
        .route("/recommendations", post(recommendations::preview))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
