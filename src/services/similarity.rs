//! Feature-similarity engine.
//!
//! Seed and candidate matrices are standardized independently (each against
//! its own column statistics), rows are scaled to unit length, and the cosine
//! similarity of every seed/candidate pair is the dot product of the two rows.

use ndarray::{Array2, ArrayView1, Axis};

use crate::services::features::FeatureTable;

/// Dense seed x candidate cosine similarities
///
/// Row `i` belongs to seed track `i`, column `j` to candidate track `j`, in
/// the order of the feature tables it was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    values: Array2<f64>,
}

impl From<Array2<f64>> for SimilarityMatrix {
    fn from(values: Array2<f64>) -> Self {
        Self { values }
    }
}

impl SimilarityMatrix {
    pub fn seed_count(&self) -> usize {
        self.values.nrows()
    }

    pub fn candidate_count(&self) -> usize {
        self.values.ncols()
    }

    pub fn get(&self, seed: usize, candidate: usize) -> f64 {
        self.values[[seed, candidate]]
    }

    /// Similarities of one seed against every candidate
    pub fn row(&self, seed: usize) -> ArrayView1<'_, f64> {
        self.values.row(seed)
    }
}

/// Standardizes every column to zero mean and unit variance
///
/// Uses the population standard deviation. A constant column maps to all
/// zeros, including one whose float mean drifts off the repeated value.
pub fn standardize(matrix: &Array2<f64>) -> Array2<f64> {
    let mut scaled = matrix.clone();
    let Some(means) = matrix.mean_axis(Axis(0)) else {
        return scaled;
    };
    let std_devs = matrix.std_axis(Axis(0), 0.0);
    let n = matrix.nrows() as f64;

    for ((mut column, &mean), &std_dev) in scaled
        .axis_iter_mut(Axis(1))
        .zip(means.iter())
        .zip(std_devs.iter())
    {
        if is_constant(column.view(), mean, std_dev, n) {
            column.fill(0.0);
        } else {
            column.mapv_inplace(|v| (v - mean) / std_dev);
        }
    }

    scaled
}

/// Zero spread, or spread within rounding noise of the column's magnitude
fn is_constant(column: ArrayView1<'_, f64>, mean: f64, std_dev: f64, n: f64) -> bool {
    let all_equal = column
        .first()
        .map_or(true, |first| column.iter().all(|v| v == first));

    all_equal || std_dev <= f64::EPSILON * mean.abs().max(1.0) * n
}

/// Scales every row to unit L2 norm; all-zero rows stay zero
pub fn normalize_rows(matrix: &Array2<f64>) -> Array2<f64> {
    let mut normalized = matrix.clone();

    for mut row in normalized.axis_iter_mut(Axis(0)) {
        let norm = row.dot(&row).sqrt();
        if norm > 0.0 {
            row.mapv_inplace(|v| v / norm);
        }
    }

    normalized
}

/// Cosine similarity of every seed row against every candidate row
pub fn compute_similarity(seeds: &FeatureTable, candidates: &FeatureTable) -> SimilarityMatrix {
    let seed_unit = normalize_rows(&standardize(&seeds.to_matrix()));
    let candidate_unit = normalize_rows(&standardize(&candidates.to_matrix()));

    let values = seed_unit.dot(&candidate_unit.t());

    tracing::info!(
        seeds = values.nrows(),
        candidates = values.ncols(),
        "Similarity matrix computed"
    );

    SimilarityMatrix { values }
}
