use serde::{Deserialize, Serialize};

use super::TrackId;
use crate::error::{AppError, AppResult};

pub const FEATURE_COUNT: usize = 12;

/// Column order of every feature table and derived matrix
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "acousticness",
    "danceability",
    "duration_ms",
    "energy",
    "instrumentalness",
    "key",
    "liveness",
    "loudness",
    "mode",
    "speechiness",
    "tempo",
    "valence",
];

/// Acoustic profile of a single track
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub acousticness: f64,
    pub danceability: f64,
    pub duration_ms: f64,
    pub energy: f64,
    pub instrumentalness: f64,
    pub key: f64,
    pub liveness: f64,
    pub loudness: f64,
    pub mode: f64,
    pub speechiness: f64,
    pub tempo: f64,
    pub valence: f64,
}

impl FeatureVector {
    /// Values in `FEATURE_COLUMNS` order
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.acousticness,
            self.danceability,
            self.duration_ms,
            self.energy,
            self.instrumentalness,
            self.key,
            self.liveness,
            self.loudness,
            self.mode,
            self.speechiness,
            self.tempo,
            self.valence,
        ]
    }

    pub fn from_array(values: [f64; FEATURE_COUNT]) -> Self {
        let [
            acousticness,
            danceability,
            duration_ms,
            energy,
            instrumentalness,
            key,
            liveness,
            loudness,
            mode,
            speechiness,
            tempo,
            valence,
        ] = values;
        Self {
            acousticness,
            danceability,
            duration_ms,
            energy,
            instrumentalness,
            key,
            liveness,
            loudness,
            mode,
            speechiness,
            tempo,
            valence,
        }
    }
}

/// Audio-features record as returned by the catalog
///
/// Every field is optional on the wire; `into_feature_vector` enforces the
/// full schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioFeaturesRecord {
    #[serde(default)]
    pub id: Option<TrackId>,
    #[serde(default)]
    pub acousticness: Option<f64>,
    #[serde(default)]
    pub danceability: Option<f64>,
    #[serde(default)]
    pub duration_ms: Option<f64>,
    #[serde(default)]
    pub energy: Option<f64>,
    #[serde(default)]
    pub instrumentalness: Option<f64>,
    #[serde(default)]
    pub key: Option<f64>,
    #[serde(default)]
    pub liveness: Option<f64>,
    #[serde(default)]
    pub loudness: Option<f64>,
    #[serde(default)]
    pub mode: Option<f64>,
    #[serde(default)]
    pub speechiness: Option<f64>,
    #[serde(default)]
    pub tempo: Option<f64>,
    #[serde(default)]
    pub valence: Option<f64>,
}

impl AudioFeaturesRecord {
    /// Complete record for `id`, used by fakes and tests
    pub fn complete(id: TrackId, features: FeatureVector) -> Self {
        Self {
            id: Some(id),
            acousticness: Some(features.acousticness),
            danceability: Some(features.danceability),
            duration_ms: Some(features.duration_ms),
            energy: Some(features.energy),
            instrumentalness: Some(features.instrumentalness),
            key: Some(features.key),
            liveness: Some(features.liveness),
            loudness: Some(features.loudness),
            mode: Some(features.mode),
            speechiness: Some(features.speechiness),
            tempo: Some(features.tempo),
            valence: Some(features.valence),
        }
    }

    /// Validates the record against the requested id and the 12-column schema
    pub fn into_feature_vector(self, expected: &TrackId) -> AppResult<FeatureVector> {
        if let Some(id) = &self.id {
            if id != expected {
                return Err(AppError::Schema(format!(
                    "features returned for track {} where {} was requested",
                    id, expected
                )));
            }
        }

        let fields = [
            self.acousticness,
            self.danceability,
            self.duration_ms,
            self.energy,
            self.instrumentalness,
            self.key,
            self.liveness,
            self.loudness,
            self.mode,
            self.speechiness,
            self.tempo,
            self.valence,
        ];

        let mut values = [0.0; FEATURE_COUNT];
        for (column, (value, name)) in fields.iter().zip(FEATURE_COLUMNS).enumerate() {
            values[column] = match value {
                Some(v) if v.is_finite() => *v,
                Some(v) => {
                    return Err(AppError::Schema(format!(
                        "track {} has non-finite {} ({})",
                        expected, name, v
                    )))
                }
                None => {
                    return Err(AppError::Schema(format!(
                        "track {} is missing {}",
                        expected, name
                    )))
                }
            };
        }

        Ok(FeatureVector::from_array(values))
    }
}
