use std::collections::BTreeSet;

use crate::{
    error::AppResult,
    models::{AlbumId, ArtistId, TopTrack, TrackId},
    services::providers::CatalogProvider,
};

pub type ArtistSet = BTreeSet<ArtistId>;
pub type AlbumSet = BTreeSet<AlbumId>;
/// Deduplicated candidate track ids, iterated in a stable order
pub type CandidatePool = BTreeSet<TrackId>;

/// Albums fetched per artist; only the first one is kept
const ALBUMS_PER_ARTIST: u32 = 1;

/// Knobs of the candidate graph walk
#[derive(Debug, Clone, PartialEq)]
pub struct ExpansionSettings {
    /// Page size of the new-releases listing
    pub new_releases_limit: u32,
    /// Tracks taken from the first page of each album's listing
    pub tracks_per_album: u32,
}

impl Default for ExpansionSettings {
    fn default() -> Self {
        Self {
            new_releases_limit: 20,
            tracks_per_album: 1,
        }
    }
}

/// Primary artists of the seed tracks
pub fn seed_artists(seeds: &[TopTrack]) -> ArtistSet {
    seeds.iter().map(|track| track.artist_id.clone()).collect()
}

/// Unions every artist's related artists into the set
pub async fn with_related_artists(
    provider: &dyn CatalogProvider,
    artists: ArtistSet,
) -> AppResult<ArtistSet> {
    let mut expanded = artists.clone();

    for artist in &artists {
        let related = provider.related_artists(artist).await?;
        expanded.extend(related);
    }

    tracing::info!(
        before = artists.len(),
        after = expanded.len(),
        "Related artists merged"
    );

    Ok(expanded)
}

/// Unions the primary artists of one page of new releases into the set
pub async fn with_new_release_artists(
    provider: &dyn CatalogProvider,
    mut artists: ArtistSet,
    limit: u32,
) -> AppResult<ArtistSet> {
    let before = artists.len();
    let releases = provider.new_releases(limit).await?;

    artists.extend(releases.into_iter().map(|album| album.artist_id));

    tracing::info!(
        before,
        after = artists.len(),
        "New-release artists merged"
    );

    Ok(artists)
}

/// The first album the catalog returns for each artist
///
/// Artists without albums contribute nothing.
pub async fn representative_albums(
    provider: &dyn CatalogProvider,
    artists: &ArtistSet,
) -> AppResult<AlbumSet> {
    let mut albums = AlbumSet::new();

    for artist in artists {
        match provider
            .artist_albums(artist, ALBUMS_PER_ARTIST)
            .await?
            .into_iter()
            .next()
        {
            Some(album) => {
                albums.insert(album);
            }
            None => tracing::debug!(artist_id = %artist, "Artist has no albums, skipping"),
        }
    }

    tracing::info!(
        artists = artists.len(),
        albums = albums.len(),
        "Representative albums selected"
    );

    Ok(albums)
}

/// Union of the first track page of every album
pub async fn album_tracks(
    provider: &dyn CatalogProvider,
    albums: &AlbumSet,
    tracks_per_album: u32,
) -> AppResult<CandidatePool> {
    let mut pool = CandidatePool::new();

    for album in albums {
        let tracks = provider.album_tracks(album, tracks_per_album).await?;
        pool.extend(tracks);
    }

    Ok(pool)
}

/// Walks seeds → artists → related artists → new-release artists → albums →
/// tracks
///
/// Any provider failure aborts the whole expansion; a partial pool is never
/// returned.
pub async fn expand_candidates(
    provider: &dyn CatalogProvider,
    seeds: &[TopTrack],
    settings: &ExpansionSettings,
) -> AppResult<CandidatePool> {
    let artists = seed_artists(seeds);
    let artists = with_related_artists(provider, artists).await?;
    let artists = with_new_release_artists(provider, artists, settings.new_releases_limit).await?;
    let albums = representative_albums(provider, &artists).await?;
    let pool = album_tracks(provider, &albums, settings.tracks_per_album).await?;

    tracing::info!(
        seeds = seeds.len(),
        artists = artists.len(),
        albums = albums.len(),
        candidates = pool.len(),
        "Candidate pool built"
    );

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::ReleasedAlbum;
    use crate::services::providers::MockCatalogProvider;

    fn top(track: &str, artist: &str) -> TopTrack {
        TopTrack {
            id: TrackId::from(track),
            artist_id: ArtistId::from(artist),
            artist_name: artist.to_uppercase(),
        }
    }

    fn artist_set(ids: &[&str]) -> ArtistSet {
        ids.iter().map(|id| ArtistId::from(*id)).collect()
    }

    #[test]
    fn test_seed_artists_deduplicates() {
        let seeds = vec![top("t1", "a1"), top("t2", "a1"), top("t3", "a2")];
        assert_eq!(seed_artists(&seeds), artist_set(&["a1", "a2"]));
    }

    #[tokio::test]
    async fn test_related_artists_superset_of_input() {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_related_artists()
            .times(2)
            .returning(|artist| {
                Ok(match artist.as_str() {
                    "a1" => vec![ArtistId::from("r1"), ArtistId::from("a2")],
                    _ => vec![ArtistId::from("r1"), ArtistId::from("r2")],
                })
            });

        let expanded = with_related_artists(&provider, artist_set(&["a1", "a2"]))
            .await
            .unwrap();

        assert_eq!(expanded, artist_set(&["a1", "a2", "r1", "r2"]));
    }

    #[tokio::test]
    async fn test_new_release_artists_merged() {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_new_releases()
            .withf(|limit| *limit == 20)
            .times(1)
            .returning(|_| {
                Ok(vec![
                    ReleasedAlbum {
                        id: AlbumId::from("n1"),
                        artist_id: ArtistId::from("a1"),
                    },
                    ReleasedAlbum {
                        id: AlbumId::from("n2"),
                        artist_id: ArtistId::from("a9"),
                    },
                ])
            });

        let artists = with_new_release_artists(&provider, artist_set(&["a1"]), 20)
            .await
            .unwrap();

        assert_eq!(artists, artist_set(&["a1", "a9"]));
    }

    #[tokio::test]
    async fn test_artist_without_albums_contributes_nothing() {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_artist_albums()
            .withf(|_, limit| *limit == 1)
            .returning(|artist, _| {
                Ok(match artist.as_str() {
                    "empty" => vec![],
                    other => vec![AlbumId::from(format!("{}-album", other))],
                })
            });

        let albums = representative_albums(&provider, &artist_set(&["a1", "empty"]))
            .await
            .unwrap();

        assert_eq!(albums.len(), 1);
        assert!(albums.contains(&AlbumId::from("a1-album")));
    }

    #[tokio::test]
    async fn test_album_tracks_deduplicates_pool() {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_album_tracks()
            .times(2)
            .returning(|_, _| Ok(vec![TrackId::from("shared")]));

        let albums: AlbumSet = [AlbumId::from("al1"), AlbumId::from("al2")]
            .into_iter()
            .collect();
        let pool = album_tracks(&provider, &albums, 1).await.unwrap();

        assert_eq!(pool.len(), 1);
    }

    #[tokio::test]
    async fn test_provider_failure_aborts_expansion() {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_related_artists()
            .returning(|_| Err(AppError::Provider("rate limited".to_string())));
        provider.expect_new_releases().never();
        provider.expect_artist_albums().never();
        provider.expect_album_tracks().never();

        let result =
            expand_candidates(&provider, &[top("t1", "a1")], &ExpansionSettings::default()).await;

        assert_eq!(result.unwrap_err().kind(), "provider");
    }

    #[tokio::test]
    async fn test_full_expansion() {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_related_artists()
            .returning(|_| Ok(vec![ArtistId::from("r1")]));
        provider.expect_new_releases().returning(|_| {
            Ok(vec![ReleasedAlbum {
                id: AlbumId::from("fresh"),
                artist_id: ArtistId::from("n1"),
            }])
        });
        provider.expect_artist_albums().returning(|artist, _| {
            Ok(vec![
                AlbumId::from(format!("{}-first", artist)),
                AlbumId::from(format!("{}-second", artist)),
            ])
        });
        provider
            .expect_album_tracks()
            .withf(|_, limit| *limit == 1)
            .returning(|album, _| Ok(vec![TrackId::from(format!("{}-t1", album))]));

        let pool = expand_candidates(
            &provider,
            &[top("s1", "a1"), top("s2", "a1")],
            &ExpansionSettings::default(),
        )
        .await
        .unwrap();

        let expected: CandidatePool = ["a1-first-t1", "n1-first-t1", "r1-first-t1"]
            .into_iter()
            .map(TrackId::from)
            .collect();
        assert_eq!(pool, expected);
    }
}
