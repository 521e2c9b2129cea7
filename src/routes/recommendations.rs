use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::Recommendation,
    routes::{require_non_empty, AppState, SelectionOverrides},
    services::compute_recommendations,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub access_token: String,
    #[serde(flatten)]
    pub overrides: SelectionOverrides,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub tracks: Recommendation,
    pub seed_count: usize,
    pub candidate_count: usize,
    pub generated_at: DateTime<Utc>,
}

/// Computes the recommendation without creating a playlist
pub async fn preview(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    require_non_empty("access_token", &request.access_token)?;
    let settings = request.overrides.apply(&state.settings)?;

    tracing::info!(request_id = %request_id, "Processing recommendation preview");

    let provider = state.connector.connect(&request.access_token);
    let run = compute_recommendations(provider.as_ref(), &settings)
        .await
        .inspect_err(|e| {
            tracing::error!(
                request_id = %request_id,
                kind = e.kind(),
                error = %e,
                "Recommendation preview failed"
            );
        })?;

    Ok(Json(RecommendationResponse {
        tracks: run.recommendation,
        seed_count: run.seed_ids.len(),
        candidate_count: run.candidate_ids.len(),
        generated_at: run.generated_at,
    }))
}
