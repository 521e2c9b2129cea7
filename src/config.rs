use serde::Deserialize;

use crate::error::AppResult;
use crate::services::recommendations::PipelineSettings;
use crate::services::recommender::RecommenderSettings;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Catalog Web API base URL
    #[serde(default = "default_catalog_api_url")]
    pub catalog_api_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Timeout applied to every catalog call
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Number of top tracks used as seeds
    #[serde(default = "default_top_tracks_limit")]
    pub top_tracks_limit: u32,

    /// Listening window for top tracks (short_term, medium_term, long_term)
    #[serde(default = "default_top_tracks_time_range")]
    pub top_tracks_time_range: String,

    /// Page size of the new-releases listing
    #[serde(default = "default_new_releases_limit")]
    pub new_releases_limit: u32,

    /// Minimum cosine similarity for a candidate to qualify
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// Maximum recommendations contributed by each seed track
    #[serde(default = "default_per_seed_limit")]
    pub per_seed_limit: usize,

    #[serde(default = "default_playlist_name")]
    pub playlist_name: String,

    #[serde(default = "default_playlist_description")]
    pub playlist_description: String,
}

fn default_catalog_api_url() -> String {
    "https://api.spotify.com/v1".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_top_tracks_limit() -> u32 {
    20
}

fn default_top_tracks_time_range() -> String {
    "short_term".to_string()
}

fn default_new_releases_limit() -> u32 {
    20
}

fn default_similarity_threshold() -> f64 {
    0.7
}

fn default_per_seed_limit() -> usize {
    5
}

fn default_playlist_name() -> String {
    "Resonance Recommended Playlist".to_string()
}

fn default_playlist_description() -> String {
    "Tracks picked by acoustic similarity to your recent top tracks".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Settings handed to every pipeline run
    /// Pipeline defaults for every request, rejected here if out of range
    pub fn pipeline_settings(&self) -> AppResult<PipelineSettings> {
        let settings = PipelineSettings {
            top_tracks_limit: self.top_tracks_limit,
            time_range: self.top_tracks_time_range.clone(),
            new_releases_limit: self.new_releases_limit,
            recommender: RecommenderSettings {
                threshold: self.similarity_threshold,
                per_seed_limit: self.per_seed_limit,
            },
            playlist_name: self.playlist_name.clone(),
            playlist_description: self.playlist_description.clone(),
        };
        settings.recommender.validate()?;
        Ok(settings)
    }
}
