/// Spotify Web API provider
///
/// Session-bound adapter: each instance carries the listener's bearer token
/// and is created per pipeline run through `SpotifyConnector`.
///
/// API Flow:
/// 1. Seeds: /me/top/tracks → track ids with their first artist
/// 2. Expansion: /artists/{id}/related-artists, /browse/new-releases,
///    /artists/{id}/albums, /albums/{id}/tracks
/// 3. Features: /audio-features?ids= (max 100 ids per call)
/// 4. Publish: /users/{user}/playlists then /playlists/{id}/tracks
use crate::{
    error::{AppError, AppResult},
    models::{
        AlbumId, ApiAlbum, ApiAudioFeatures, ApiNewReleases, ApiPage, ApiPlaylist,
        ApiRelatedArtists, ApiTrack, ArtistId, AudioFeaturesRecord, ListenerId, PlaylistId,
        ReleasedAlbum, TopTrack, TrackId,
    },
    services::providers::{CatalogProvider, ProviderConnector, MAX_IDS_PER_CALL},
};
use reqwest::{Client as HttpClient, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const PROVIDER_NAME: &str = "spotify";

#[derive(Clone)]
pub struct SpotifyProvider {
    http_client: HttpClient,
    access_token: String,
    api_url: String,
}

impl SpotifyProvider {
    pub fn new(http_client: HttpClient, access_token: String, api_url: String) -> Self {
        Self {
            http_client,
            access_token,
            api_url,
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.http_client
            .get(format!("{}{}", self.api_url, path))
            .bearer_auth(&self.access_token)
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.http_client
            .post(format!("{}{}", self.api_url, path))
            .bearer_auth(&self.access_token)
    }

    /// Sends the request and decodes a successful JSON body
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> AppResult<T> {
        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        Ok(response.json().await?)
    }
}

/// Maps a non-success status to a provider error
fn status_error(status: StatusCode, body: &str) -> AppError {
    let reason = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => "authorization failed",
        StatusCode::TOO_MANY_REQUESTS => "rate limited",
        _ => "request failed",
    };

    AppError::Provider(format!(
        "Spotify API {} (status {}): {}",
        reason, status, body
    ))
}

fn join_ids<T: ToString>(ids: &[T]) -> String {
    ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
}

#[async_trait::async_trait]
impl CatalogProvider for SpotifyProvider {
    async fn top_tracks(&self, limit: u32, time_range: &str) -> AppResult<Vec<TopTrack>> {
        let limit = limit.to_string();
        let page: ApiPage<ApiTrack> = self
            .send_json(
                self.get("/me/top/tracks")
                    .query(&[("time_range", time_range), ("limit", limit.as_str())]),
            )
            .await?;

        let tracks = page
            .items
            .into_iter()
            .map(TopTrack::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(AppError::Provider)?;

        tracing::info!(
            tracks = tracks.len(),
            time_range = %time_range,
            provider = PROVIDER_NAME,
            "Top tracks fetched"
        );

        Ok(tracks)
    }

    async fn audio_features(
        &self,
        ids: &[TrackId],
    ) -> AppResult<Vec<Option<AudioFeaturesRecord>>> {
        if ids.len() > MAX_IDS_PER_CALL {
            return Err(AppError::InvalidInput(format!(
                "audio features requested for {} ids, limit is {}",
                ids.len(),
                MAX_IDS_PER_CALL
            )));
        }

        let response: ApiAudioFeatures = self
            .send_json(self.get("/audio-features").query(&[("ids", join_ids(ids))]))
            .await?;

        tracing::debug!(
            requested = ids.len(),
            returned = response.audio_features.len(),
            provider = PROVIDER_NAME,
            "Audio features fetched"
        );

        Ok(response.audio_features)
    }

    async fn related_artists(&self, artist: &ArtistId) -> AppResult<Vec<ArtistId>> {
        let response: ApiRelatedArtists = self
            .send_json(self.get(&format!("/artists/{}/related-artists", artist)))
            .await?;

        Ok(response
            .artists
            .into_iter()
            .map(|a| ArtistId::from(a.id))
            .collect())
    }

    async fn new_releases(&self, limit: u32) -> AppResult<Vec<ReleasedAlbum>> {
        let response: ApiNewReleases = self
            .send_json(
                self.get("/browse/new-releases")
                    .query(&[("limit", limit.to_string())]),
            )
            .await?;

        response
            .albums
            .items
            .into_iter()
            .map(ReleasedAlbum::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(AppError::Provider)
    }

    async fn artist_albums(&self, artist: &ArtistId, limit: u32) -> AppResult<Vec<AlbumId>> {
        let page: ApiPage<ApiAlbum> = self
            .send_json(
                self.get(&format!("/artists/{}/albums", artist))
                    .query(&[("limit", limit.to_string())]),
            )
            .await?;

        Ok(page.items.into_iter().map(|a| AlbumId::from(a.id)).collect())
    }

    async fn album_tracks(&self, album: &AlbumId, limit: u32) -> AppResult<Vec<TrackId>> {
        let page: ApiPage<ApiTrack> = self
            .send_json(
                self.get(&format!("/albums/{}/tracks", album))
                    .query(&[("limit", limit.to_string())]),
            )
            .await?;

        Ok(page.items.into_iter().map(|t| TrackId::from(t.id)).collect())
    }

    async fn create_playlist(
        &self,
        owner: &ListenerId,
        name: &str,
        description: &str,
    ) -> AppResult<PlaylistId> {
        let playlist: ApiPlaylist = self
            .send_json(
                self.post(&format!("/users/{}/playlists", owner))
                    .json(&json!({ "name": name, "description": description })),
            )
            .await?;

        tracing::info!(
            playlist_id = %playlist.id,
            owner = %owner,
            provider = PROVIDER_NAME,
            "Playlist created"
        );

        Ok(PlaylistId::from(playlist.id))
    }

    async fn add_tracks_to_playlist(
        &self,
        playlist: &PlaylistId,
        tracks: &[TrackId],
    ) -> AppResult<()> {
        if tracks.len() > MAX_IDS_PER_CALL {
            return Err(AppError::InvalidInput(format!(
                "{} tracks in one append, limit is {}",
                tracks.len(),
                MAX_IDS_PER_CALL
            )));
        }

        let uris: Vec<String> = tracks
            .iter()
            .map(|id| format!("spotify:track:{}", id))
            .collect();

        let _: serde_json::Value = self
            .send_json(
                self.post(&format!("/playlists/{}/tracks", playlist))
                    .json(&json!({ "uris": uris })),
            )
            .await?;

        Ok(())
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

/// Creates `SpotifyProvider` sessions sharing one HTTP connection pool
pub struct SpotifyConnector {
    http_client: HttpClient,
    api_url: String,
}

impl SpotifyConnector {
    pub fn new(api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            api_url,
        })
    }
}

impl ProviderConnector for SpotifyConnector {
    fn connect(&self, access_token: &str) -> Arc<dyn CatalogProvider> {
        Arc::new(SpotifyProvider::new(
            self.http_client.clone(),
            access_token.to_string(),
            self.api_url.clone(),
        ))
    }
}
