use std::sync::Arc;

/// Music catalog provider abstraction
///
/// Every pipeline stage receives the provider it talks to explicitly; a
/// provider value is bound to one listener session (access token) and lives
/// for a single run.
use crate::{
    error::AppResult,
    models::{
        AlbumId, ArtistId, AudioFeaturesRecord, ListenerId, PlaylistId, ReleasedAlbum, TopTrack,
        TrackId,
    },
};

pub mod spotify;

/// Maximum ids per audio-features call, also the per-call cap for
/// appending tracks to a playlist
pub const MAX_IDS_PER_CALL: usize = 100;

/// Trait for catalog providers
///
/// Any failure of the remote service (transport, auth, rate limit) is an
/// `AppError::Provider`/`AppError::HttpClient`; implementations do not retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// The listener's top tracks, most played first
    async fn top_tracks(&self, limit: u32, time_range: &str) -> AppResult<Vec<TopTrack>>;

    /// Audio features for at most `MAX_IDS_PER_CALL` ids, in request order
    ///
    /// A `None` entry means the catalog has no features for that id.
    async fn audio_features(&self, ids: &[TrackId]) -> AppResult<Vec<Option<AudioFeaturesRecord>>>;

    async fn related_artists(&self, artist: &ArtistId) -> AppResult<Vec<ArtistId>>;

    /// One page of newly released albums
    async fn new_releases(&self, limit: u32) -> AppResult<Vec<ReleasedAlbum>>;

    /// The artist's albums in catalog order; may be empty
    async fn artist_albums(&self, artist: &ArtistId, limit: u32) -> AppResult<Vec<AlbumId>>;

    /// First page of the album's track listing
    async fn album_tracks(&self, album: &AlbumId, limit: u32) -> AppResult<Vec<TrackId>>;

    async fn create_playlist(
        &self,
        owner: &ListenerId,
        name: &str,
        description: &str,
    ) -> AppResult<PlaylistId>;

    /// Appends at most `MAX_IDS_PER_CALL` tracks
    async fn add_tracks_to_playlist(&self, playlist: &PlaylistId, tracks: &[TrackId])
        -> AppResult<()>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Opens a provider session for a listener's access token
///
/// Held by the application state so routes never share a session.
pub trait ProviderConnector: Send + Sync {
    fn connect(&self, access_token: &str) -> Arc<dyn CatalogProvider>;
}
