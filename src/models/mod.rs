use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt::Display};

pub mod features;

pub use features::{AudioFeaturesRecord, FeatureVector, FEATURE_COLUMNS, FEATURE_COUNT};

/// Declares an opaque, provider-issued string identifier
macro_rules! catalog_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

catalog_id!(
    /// Catalog track identifier (e.g. "6rqhFgbbKwnb9MLmUQDhG6")
    TrackId
);
catalog_id!(
    /// Catalog artist identifier
    ArtistId
);
catalog_id!(
    /// Catalog album identifier
    AlbumId
);
catalog_id!(
    /// Identifier of a playlist created on the listener's account
    PlaylistId
);
catalog_id!(
    /// Catalog user that owns the created playlist
    ListenerId
);

/// One entry of the listener's top-played list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopTrack {
    pub id: TrackId,
    /// First credited artist on the track
    pub artist_id: ArtistId,
    pub artist_name: String,
}

/// An album from the new-releases listing with its primary artist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleasedAlbum {
    pub id: AlbumId,
    pub artist_id: ArtistId,
}

/// Final list of recommended tracks
///
/// Never contains the same track twice. Order is first-occurrence order from
/// the recommender (seed order, then similarity rank).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Recommendation {
    tracks: Vec<TrackId>,
}

impl Recommendation {
    /// Builds a recommendation from ranked tracks, keeping the first
    /// occurrence of every id
    pub fn from_ordered(tracks: Vec<TrackId>) -> Self {
        let mut seen = HashSet::with_capacity(tracks.len());
        let tracks = tracks
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();
        Self { tracks }
    }

    pub fn track_ids(&self) -> &[TrackId] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn contains(&self, id: &TrackId) -> bool {
        self.tracks.contains(id)
    }
}

// ============================================================================
// Catalog Web API Types
// ============================================================================

/// Generic paging object wrapping list responses
#[derive(Debug, Clone, Deserialize)]
pub struct ApiPage<T> {
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiArtistRef {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiTrack {
    pub id: String,
    #[serde(default)]
    pub artists: Vec<ApiArtistRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiAlbum {
    pub id: String,
    #[serde(default)]
    pub artists: Vec<ApiArtistRef>,
}

/// Response from GET /artists/{id}/related-artists
#[derive(Debug, Clone, Deserialize)]
pub struct ApiRelatedArtists {
    pub artists: Vec<ApiArtistRef>,
}

/// Response from GET /browse/new-releases
#[derive(Debug, Clone, Deserialize)]
pub struct ApiNewReleases {
    pub albums: ApiPage<ApiAlbum>,
}

/// Response from GET /audio-features
///
/// Unknown ids come back as `null` entries.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiAudioFeatures {
    pub audio_features: Vec<Option<AudioFeaturesRecord>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiPlaylist {
    pub id: String,
}

impl TryFrom<ApiTrack> for TopTrack {
    type Error = String;

    fn try_from(track: ApiTrack) -> Result<Self, Self::Error> {
        let artist = track
            .artists
            .into_iter()
            .next()
            .ok_or_else(|| format!("track {} has no artists", track.id))?;

        Ok(TopTrack {
            id: TrackId(track.id),
            artist_id: ArtistId(artist.id),
            artist_name: artist.name,
        })
    }
}

impl TryFrom<ApiAlbum> for ReleasedAlbum {
    type Error = String;

    fn try_from(album: ApiAlbum) -> Result<Self, Self::Error> {
        let artist = album
            .artists
            .into_iter()
            .next()
            .ok_or_else(|| format!("album {} has no artists", album.id))?;

        Ok(ReleasedAlbum {
            id: AlbumId(album.id),
            artist_id: ArtistId(artist.id),
        })
    }
}
