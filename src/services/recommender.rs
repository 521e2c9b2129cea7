use std::collections::HashSet;

use ndarray::ArrayView1;

use crate::{
    error::{AppError, AppResult},
    models::{Recommendation, TrackId},
    services::similarity::SimilarityMatrix,
};

/// Selection rules applied to every seed row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommenderSettings {
    /// Minimum cosine similarity (inclusive)
    pub threshold: f64,
    /// Maximum candidates kept per seed, applied before cross-seed dedup
    pub per_seed_limit: usize,
}

impl Default for RecommenderSettings {
    fn default() -> Self {
        Self {
            threshold: 0.7,
            per_seed_limit: 5,
        }
    }
}

impl RecommenderSettings {
    pub fn validate(&self) -> AppResult<()> {
        if !(-1.0..=1.0).contains(&self.threshold) {
            return Err(AppError::InvalidInput(format!(
                "similarity threshold must be within [-1, 1], got {}",
                self.threshold
            )));
        }
        if self.per_seed_limit == 0 {
            return Err(AppError::InvalidInput(
                "per-seed limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Candidate column indices for one seed: similarity >= threshold, best first
/// (ties broken by lower column index), at most `limit` of them
pub fn select_for_seed(
    similarities: ArrayView1<'_, f64>,
    threshold: f64,
    limit: usize,
) -> Vec<usize> {
    let mut selected: Vec<usize> = similarities
        .iter()
        .enumerate()
        .filter(|(_, similarity)| **similarity >= threshold)
        .map(|(index, _)| index)
        .collect();

    selected.sort_by(|a, b| {
        similarities[*b]
            .total_cmp(&similarities[*a])
            .then_with(|| a.cmp(b))
    });
    selected.truncate(limit);
    selected
}

/// Turns the similarity matrix into the final recommendation
///
/// `candidate_ids` must be aligned with the matrix columns. Seed tracks are
/// never recommended and each track appears once.
pub fn recommend(
    matrix: &SimilarityMatrix,
    seed_ids: &[TrackId],
    candidate_ids: &[TrackId],
    settings: &RecommenderSettings,
) -> AppResult<Recommendation> {
    if matrix.seed_count() != seed_ids.len() || matrix.candidate_count() != candidate_ids.len() {
        return Err(AppError::Internal(format!(
            "similarity matrix is {}x{} but {} seeds and {} candidates were given",
            matrix.seed_count(),
            matrix.candidate_count(),
            seed_ids.len(),
            candidate_ids.len()
        )));
    }

    let mut ranked = Vec::new();
    for seed in 0..matrix.seed_count() {
        let picks = select_for_seed(matrix.row(seed), settings.threshold, settings.per_seed_limit);

        if picks.is_empty() {
            tracing::debug!(seed_id = %seed_ids[seed], "No candidate above threshold");
        }

        ranked.extend(picks.into_iter().map(|j| candidate_ids[j].clone()));
    }

    let seeds: HashSet<&TrackId> = seed_ids.iter().collect();
    let picked = ranked.len();
    ranked.retain(|id| !seeds.contains(id));

    let recommendation = Recommendation::from_ordered(ranked);

    tracing::info!(
        picked,
        recommended = recommendation.len(),
        threshold = settings.threshold,
        per_seed_limit = settings.per_seed_limit,
        "Recommendations selected"
    );

    Ok(recommendation)
}
