use ndarray::Array2;

use crate::{
    error::{AppError, AppResult},
    models::{FeatureVector, TrackId, FEATURE_COUNT},
    services::{
        batching::chunk,
        providers::{CatalogProvider, MAX_IDS_PER_CALL},
    },
};

/// Ordered (track, features) rows
///
/// Row `i` of `to_matrix()` always belongs to `track_ids()[i]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureTable {
    rows: Vec<(TrackId, FeatureVector)>,
}

impl FeatureTable {
    pub fn new(rows: Vec<(TrackId, FeatureVector)>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[(TrackId, FeatureVector)] {
        &self.rows
    }

    pub fn track_ids(&self) -> Vec<TrackId> {
        self.rows.iter().map(|(id, _)| id.clone()).collect()
    }

    /// Numeric `len() x FEATURE_COUNT` matrix without the id column
    pub fn to_matrix(&self) -> Array2<f64> {
        let mut matrix = Array2::zeros((self.rows.len(), FEATURE_COUNT));
        for (mut row, (_, features)) in matrix.rows_mut().into_iter().zip(&self.rows) {
            for (cell, value) in row.iter_mut().zip(features.to_array()) {
                *cell = value;
            }
        }
        matrix
    }
}

/// Fetches features for `ids` in batches of at most `MAX_IDS_PER_CALL` and
/// builds a table with one row per id, in input order
///
/// Fails with `AppError::Schema` when the catalog returns a different number
/// of records than requested, a null record, or a record missing a column.
pub async fn build_feature_table(
    provider: &dyn CatalogProvider,
    ids: &[TrackId],
) -> AppResult<FeatureTable> {
    let mut rows = Vec::with_capacity(ids.len());

    for (batch_index, batch) in chunk(ids, MAX_IDS_PER_CALL).enumerate() {
        let records = provider.audio_features(batch).await?;

        if records.len() != batch.len() {
            return Err(AppError::Schema(format!(
                "requested features for {} tracks in batch {}, received {}",
                batch.len(),
                batch_index,
                records.len()
            )));
        }

        for (id, record) in batch.iter().zip(records) {
            let record = record.ok_or_else(|| {
                AppError::Schema(format!("no audio features available for track {}", id))
            })?;
            rows.push((id.clone(), record.into_feature_vector(id)?));
        }

        tracing::debug!(
            batch = batch_index,
            size = batch.len(),
            "Feature batch fetched"
        );
    }

    tracing::info!(rows = rows.len(), "Feature table built");

    Ok(FeatureTable::new(rows))
}
