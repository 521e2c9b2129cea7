#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use resonance_api::{
    error::{AppError, AppResult},
    models::{
        AlbumId, ArtistId, AudioFeaturesRecord, FeatureVector, ListenerId, PlaylistId,
        ReleasedAlbum, TopTrack, TrackId, FEATURE_COUNT,
    },
    services::{CatalogProvider, ProviderConnector},
};

/// Low end of every feature column
pub const LOW: [f64; FEATURE_COUNT] = [
    0.1, 0.2, 180_000.0, 0.3, 0.0, 1.0, 0.1, -9.0, 0.0, 0.03, 90.0, 0.2,
];

/// High end of every feature column (strictly above `LOW` everywhere)
pub const HIGH: [f64; FEATURE_COUNT] = [
    0.9, 0.8, 240_000.0, 0.7, 0.5, 7.0, 0.4, -4.0, 1.0, 0.09, 140.0, 0.8,
];

/// Values between `LOW` and `HIGH`, `t` in [0, 1]
pub fn blend(t: f64) -> [f64; FEATURE_COUNT] {
    let mut values = [0.0; FEATURE_COUNT];
    for (i, value) in values.iter_mut().enumerate() {
        *value = LOW[i] + (HIGH[i] - LOW[i]) * t;
    }
    values
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreatedPlaylist {
    pub owner: ListenerId,
    pub name: String,
    pub tracks: Vec<TrackId>,
}

/// In-memory catalog recording the calls the pipeline makes
#[derive(Default)]
pub struct FakeCatalog {
    top_tracks: Vec<TopTrack>,
    features: HashMap<TrackId, FeatureVector>,
    related: HashMap<ArtistId, Vec<ArtistId>>,
    new_releases: Vec<ReleasedAlbum>,
    albums: HashMap<ArtistId, Vec<AlbumId>>,
    album_tracks: HashMap<AlbumId, Vec<TrackId>>,
    pub fail_top_tracks: bool,
    pub fail_create_playlist: bool,
    pub feature_batches: Mutex<Vec<usize>>,
    pub playlists: Mutex<Vec<CreatedPlaylist>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(mut self, track: &str, artist: &str, values: [f64; FEATURE_COUNT]) -> Self {
        self.top_tracks.push(TopTrack {
            id: TrackId::from(track),
            artist_id: ArtistId::from(artist),
            artist_name: artist.to_uppercase(),
        });
        self.features
            .insert(TrackId::from(track), FeatureVector::from_array(values));
        self
    }

    pub fn related(mut self, artist: &str, related: &[&str]) -> Self {
        self.related.insert(
            ArtistId::from(artist),
            related.iter().map(|a| ArtistId::from(*a)).collect(),
        );
        self
    }

    pub fn release(mut self, album: &str, artist: &str) -> Self {
        self.new_releases.push(ReleasedAlbum {
            id: AlbumId::from(album),
            artist_id: ArtistId::from(artist),
        });
        self
    }

    /// Gives `artist` an album whose listing is `tracks`; tracks without
    /// features yet get `values`
    pub fn album(
        mut self,
        artist: &str,
        album: &str,
        tracks: &[&str],
        values: [f64; FEATURE_COUNT],
    ) -> Self {
        self.albums
            .entry(ArtistId::from(artist))
            .or_default()
            .push(AlbumId::from(album));
        self.album_tracks.insert(
            AlbumId::from(album),
            tracks.iter().map(|t| TrackId::from(*t)).collect(),
        );
        for track in tracks {
            self.features
                .entry(TrackId::from(*track))
                .or_insert_with(|| FeatureVector::from_array(values));
        }
        self
    }

    pub fn without_features(mut self, track: &str) -> Self {
        self.features.remove(&TrackId::from(track));
        self
    }

    pub fn batches(&self) -> Vec<usize> {
        self.feature_batches.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<CreatedPlaylist> {
        self.playlists.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CatalogProvider for FakeCatalog {
    async fn top_tracks(&self, limit: u32, _time_range: &str) -> AppResult<Vec<TopTrack>> {
        if self.fail_top_tracks {
            return Err(AppError::Provider(
                "Spotify API authorization failed (status 401 Unauthorized)".to_string(),
            ));
        }
        Ok(self.top_tracks.iter().take(limit as usize).cloned().collect())
    }

    async fn audio_features(&self, ids: &[TrackId]) -> AppResult<Vec<Option<AudioFeaturesRecord>>> {
        assert!(!ids.is_empty(), "empty audio-features batch");
        assert!(ids.len() <= 100, "oversized audio-features batch");
        self.feature_batches.lock().unwrap().push(ids.len());

        Ok(ids
            .iter()
            .map(|id| {
                self.features
                    .get(id)
                    .map(|f| AudioFeaturesRecord::complete(id.clone(), *f))
            })
            .collect())
    }

    async fn related_artists(&self, artist: &ArtistId) -> AppResult<Vec<ArtistId>> {
        Ok(self.related.get(artist).cloned().unwrap_or_default())
    }

    async fn new_releases(&self, limit: u32) -> AppResult<Vec<ReleasedAlbum>> {
        Ok(self.new_releases.iter().take(limit as usize).cloned().collect())
    }

    async fn artist_albums(&self, artist: &ArtistId, limit: u32) -> AppResult<Vec<AlbumId>> {
        Ok(self
            .albums
            .get(artist)
            .map(|albums| albums.iter().take(limit as usize).cloned().collect())
            .unwrap_or_default())
    }

    async fn album_tracks(&self, album: &AlbumId, limit: u32) -> AppResult<Vec<TrackId>> {
        Ok(self
            .album_tracks
            .get(album)
            .map(|tracks| tracks.iter().take(limit as usize).cloned().collect())
            .unwrap_or_default())
    }

    async fn create_playlist(
        &self,
        owner: &ListenerId,
        name: &str,
        _description: &str,
    ) -> AppResult<PlaylistId> {
        if self.fail_create_playlist {
            return Err(AppError::Provider(
                "Spotify API rate limited (status 429 Too Many Requests)".to_string(),
            ));
        }

        let mut playlists = self.playlists.lock().unwrap();
        playlists.push(CreatedPlaylist {
            owner: owner.clone(),
            name: name.to_string(),
            tracks: Vec::new(),
        });
        Ok(PlaylistId::from(format!("playlist-{}", playlists.len())))
    }

    async fn add_tracks_to_playlist(
        &self,
        playlist: &PlaylistId,
        tracks: &[TrackId],
    ) -> AppResult<()> {
        let index: usize = playlist.as_str()["playlist-".len()..].parse().unwrap();
        self.playlists.lock().unwrap()[index - 1]
            .tracks
            .extend_from_slice(tracks);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Hands out the same fake catalog for every token, recording the tokens
pub struct FakeConnector {
    pub catalog: Arc<FakeCatalog>,
    pub tokens: Mutex<Vec<String>>,
}

impl FakeConnector {
    pub fn new(catalog: FakeCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            tokens: Mutex::new(Vec::new()),
        }
    }
}

impl ProviderConnector for FakeConnector {
    fn connect(&self, access_token: &str) -> Arc<dyn CatalogProvider> {
        self.tokens.lock().unwrap().push(access_token.to_string());
        self.catalog.clone()
    }
}

/// Two seeds at opposite ends of the feature range, a related artist, a
/// new-release artist without albums, and one album that only holds a seed
///
/// Candidates: c1 (matches s1), c2 (matches s2), s1 (already a seed).
pub fn listener_catalog() -> FakeCatalog {
    FakeCatalog::new()
        .seed("s1", "a1", LOW)
        .seed("s2", "a2", HIGH)
        .related("a1", &["r1"])
        .related("a2", &["a1"])
        .release("fresh", "n1")
        .album("a1", "al-a1", &["s1"], LOW)
        .album("a2", "al-a2", &["c2"], HIGH)
        .album("r1", "al-r1", &["c1"], LOW)
}
