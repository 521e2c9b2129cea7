use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{ListenerId, PlaylistId, Recommendation},
    routes::{require_non_empty, AppState, SelectionOverrides},
    services::build_recommended_playlist,
};

#[derive(Debug, Deserialize)]
pub struct PlaylistRequest {
    pub listener_id: String,
    pub access_token: String,
    #[serde(flatten)]
    pub overrides: SelectionOverrides,
}

#[derive(Debug, Serialize)]
pub struct PlaylistResponse {
    pub playlist_id: PlaylistId,
    pub tracks: Recommendation,
    pub seed_count: usize,
    pub candidate_count: usize,
    pub generated_at: DateTime<Utc>,
}

/// Builds the recommendation and publishes it as a new playlist
pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<PlaylistRequest>,
) -> AppResult<(StatusCode, Json<PlaylistResponse>)> {
    require_non_empty("listener_id", &request.listener_id)?;
    require_non_empty("access_token", &request.access_token)?;
    let settings = request.overrides.apply(&state.settings)?;

    tracing::info!(
        request_id = %request_id,
        listener_id = %request.listener_id,
        threshold = settings.recommender.threshold,
        "Processing playlist request"
    );

    let provider = state.connector.connect(&request.access_token);
    let listener = ListenerId::from(request.listener_id);

    let outcome = build_recommended_playlist(&listener, provider.as_ref(), &settings)
        .await
        .inspect_err(|e| {
            tracing::error!(
                request_id = %request_id,
                kind = e.kind(),
                error = %e,
                "Playlist request failed"
            );
        })?;

    tracing::info!(
        request_id = %request_id,
        playlist_id = %outcome.playlist_id,
        tracks = outcome.recommendation.len(),
        "Playlist request completed"
    );

    Ok((
        StatusCode::CREATED,
        Json(PlaylistResponse {
            playlist_id: outcome.playlist_id,
            tracks: outcome.recommendation,
            seed_count: outcome.seed_count,
            candidate_count: outcome.candidate_count,
            generated_at: outcome.generated_at,
        }),
    ))
}
