use crate::{
    error::{AppError, AppResult, PublishFailure},
    models::{ListenerId, PlaylistId, Recommendation},
    services::{
        batching::chunk,
        providers::{CatalogProvider, MAX_IDS_PER_CALL},
    },
};

/// Creates the playlist on the listener's account and appends the
/// recommended tracks
///
/// An empty recommendation still creates an (empty) playlist. No retries: the
/// first failed call becomes `AppError::Publish`, which hands the
/// recommendation back to the caller.
pub async fn publish_playlist(
    provider: &dyn CatalogProvider,
    owner: &ListenerId,
    name: &str,
    description: &str,
    recommendation: Recommendation,
) -> AppResult<(PlaylistId, Recommendation)> {
    let playlist = match provider.create_playlist(owner, name, description).await {
        Ok(playlist) => playlist,
        Err(e) => return Err(publish_error("create playlist", e, recommendation)),
    };

    let mut append_error = None;
    for tracks in chunk(recommendation.track_ids(), MAX_IDS_PER_CALL) {
        if let Err(e) = provider.add_tracks_to_playlist(&playlist, tracks).await {
            append_error = Some(e);
            break;
        }
    }

    if let Some(e) = append_error {
        return Err(publish_error("add tracks", e, recommendation));
    }

    tracing::info!(
        playlist_id = %playlist,
        tracks = recommendation.len(),
        provider = provider.name(),
        "Playlist published"
    );

    Ok((playlist, recommendation))
}

fn publish_error(step: &str, cause: AppError, recommendation: Recommendation) -> AppError {
    tracing::error!(step, error = %cause, cause_kind = cause.kind(), "Playlist publish failed");

    AppError::Publish(PublishFailure {
        reason: format!("{} failed: {}", step, cause),
        recommendation,
    })
}
