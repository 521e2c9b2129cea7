use chrono::{DateTime, Utc};
use std::time::Instant;
use tracing::instrument;

use crate::{
    error::AppResult,
    models::{ListenerId, PlaylistId, Recommendation, TrackId},
    services::{
        candidates::{expand_candidates, ExpansionSettings},
        features::build_feature_table,
        providers::CatalogProvider,
        publisher::publish_playlist,
        recommender::{recommend, RecommenderSettings},
        similarity::{compute_similarity, SimilarityMatrix},
    },
};

/// Everything a single recommendation run needs besides the provider session
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub top_tracks_limit: u32,
    pub time_range: String,
    pub new_releases_limit: u32,
    pub recommender: RecommenderSettings,
    pub playlist_name: String,
    pub playlist_description: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            top_tracks_limit: 20,
            time_range: "short_term".to_string(),
            new_releases_limit: ExpansionSettings::default().new_releases_limit,
            recommender: RecommenderSettings::default(),
            playlist_name: "Resonance Recommended Playlist".to_string(),
            playlist_description: "Tracks picked by acoustic similarity to your recent top tracks"
                .to_string(),
        }
    }
}

impl PipelineSettings {
    fn expansion(&self) -> ExpansionSettings {
        ExpansionSettings {
            new_releases_limit: self.new_releases_limit,
            ..ExpansionSettings::default()
        }
    }
}

/// Output of the compute half of the pipeline
#[derive(Debug, Clone)]
pub struct RecommendationRun {
    /// Seed ids, aligned with the similarity rows
    pub seed_ids: Vec<TrackId>,
    /// Candidate ids, aligned with the similarity columns
    pub candidate_ids: Vec<TrackId>,
    pub similarity: SimilarityMatrix,
    pub recommendation: Recommendation,
    pub generated_at: DateTime<Utc>,
}

/// Result of `build_recommended_playlist`
#[derive(Debug, Clone)]
pub struct PlaylistOutcome {
    pub playlist_id: PlaylistId,
    pub recommendation: Recommendation,
    pub seed_count: usize,
    pub candidate_count: usize,
    pub generated_at: DateTime<Utc>,
}

/// Seeds → candidate pool → feature tables → similarity → recommendation
///
/// Stages run strictly in order and any failure aborts the run. A listener
/// without top tracks yields an empty recommendation.
#[instrument(skip_all, fields(provider = provider.name()))]
pub async fn compute_recommendations(
    provider: &dyn CatalogProvider,
    settings: &PipelineSettings,
) -> AppResult<RecommendationRun> {
    settings.recommender.validate()?;
    let start = Instant::now();

    let seeds = provider
        .top_tracks(settings.top_tracks_limit, &settings.time_range)
        .await?;

    if seeds.is_empty() {
        tracing::warn!("Listener has no top tracks, nothing to recommend");
        return Ok(RecommendationRun {
            seed_ids: Vec::new(),
            candidate_ids: Vec::new(),
            similarity: compute_similarity(&Default::default(), &Default::default()),
            recommendation: Recommendation::default(),
            generated_at: Utc::now(),
        });
    }

    let seed_ids: Vec<TrackId> = seeds.iter().map(|track| track.id.clone()).collect();
    let seed_table = build_feature_table(provider, &seed_ids).await?;

    let pool = expand_candidates(provider, &seeds, &settings.expansion()).await?;
    let candidate_ids: Vec<TrackId> = pool.into_iter().collect();
    let candidate_table = build_feature_table(provider, &candidate_ids).await?;

    let similarity = compute_similarity(&seed_table, &candidate_table);
    let seed_ids = seed_table.track_ids();
    let candidate_ids = candidate_table.track_ids();
    let recommendation = recommend(&similarity, &seed_ids, &candidate_ids, &settings.recommender)?;

    tracing::info!(
        seeds = seed_ids.len(),
        candidates = candidate_ids.len(),
        recommended = recommendation.len(),
        processing_time_ms = start.elapsed().as_millis(),
        "Recommendation run completed"
    );

    Ok(RecommendationRun {
        seed_ids,
        candidate_ids,
        similarity,
        recommendation,
        generated_at: Utc::now(),
    })
}

/// Computes the recommendation and publishes it as a new playlist owned by
/// `listener`
///
/// A publish failure surfaces as `AppError::Publish` carrying the computed
/// recommendation.
#[instrument(skip_all, fields(listener = %listener))]
pub async fn build_recommended_playlist(
    listener: &ListenerId,
    provider: &dyn CatalogProvider,
    settings: &PipelineSettings,
) -> AppResult<PlaylistOutcome> {
    let run = compute_recommendations(provider, settings).await?;

    let (playlist_id, recommendation) = publish_playlist(
        provider,
        listener,
        &settings.playlist_name,
        &settings.playlist_description,
        run.recommendation,
    )
    .await?;

    Ok(PlaylistOutcome {
        playlist_id,
        recommendation,
        seed_count: run.seed_ids.len(),
        candidate_count: run.candidate_ids.len(),
        generated_at: run.generated_at,
    })
}
