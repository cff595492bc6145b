use std::fmt;

use crate::{
    config::Config,
    info,
    transport::{HttpResponse, HttpTransport},
    types::{PlaylistDetails, PlaylistTracksPage, RawTrackPayload, TrackRecord},
    warning,
};

/// Stage at which fetching a playlist stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStage {
    Metadata,
    Tracks,
}

impl fmt::Display for FetchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStage::Metadata => write!(f, "playlist details"),
            FetchStage::Tracks => write!(f, "tracks"),
        }
    }
}

/// Why a playlist contributed nothing to a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Status {
        stage: FetchStage,
        status: u16,
        body: String,
    },
    Transport {
        stage: FetchStage,
        message: String,
    },
    Malformed {
        stage: FetchStage,
        message: String,
    },
}

impl SkipReason {
    pub fn stage(&self) -> FetchStage {
        match self {
            SkipReason::Status { stage, .. }
            | SkipReason::Transport { stage, .. }
            | SkipReason::Malformed { stage, .. } => *stage,
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Status {
                stage,
                status,
                body,
            } => write!(f, "failed to fetch {stage} ({status}): {body}"),
            SkipReason::Transport { stage, message } => {
                write!(f, "failed to fetch {stage}: {message}")
            }
            SkipReason::Malformed { stage, message } => {
                write!(f, "unexpected {stage} payload: {message}")
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchedPlaylist {
    pub playlist_id: String,
    pub playlist_name: String,
    pub raw: RawTrackPayload,
    pub records: Vec<TrackRecord>,
}

#[derive(Debug, Clone)]
pub enum PlaylistOutcome {
    Fetched(FetchedPlaylist),
    Skipped {
        playlist_id: String,
        reason: SkipReason,
    },
}

/// Per-playlist outcomes of a batch, in request order.
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    pub outcomes: Vec<PlaylistOutcome>,
}

impl BatchResult {
    pub fn fetched(&self) -> impl Iterator<Item = &FetchedPlaylist> {
        self.outcomes.iter().filter_map(|o| match o {
            PlaylistOutcome::Fetched(p) => Some(p),
            PlaylistOutcome::Skipped { .. } => None,
        })
    }

    pub fn skipped(&self) -> impl Iterator<Item = (&str, &SkipReason)> {
        self.outcomes.iter().filter_map(|o| match o {
            PlaylistOutcome::Skipped {
                playlist_id,
                reason,
            } => Some((playlist_id.as_str(), reason)),
            PlaylistOutcome::Fetched(_) => None,
        })
    }

    /// Concatenates raw payloads and records of every fetched playlist,
    /// keeping playlist order and item order.
    pub fn into_export(self) -> (Vec<RawTrackPayload>, Vec<TrackRecord>) {
        let mut raw = Vec::new();
        let mut records = Vec::new();
        for outcome in self.outcomes {
            if let PlaylistOutcome::Fetched(playlist) = outcome {
                raw.push(playlist.raw);
                records.extend(playlist.records);
            }
        }
        (raw, records)
    }
}

async fn get(
    transport: &dyn HttpTransport,
    url: &str,
    token: &str,
    stage: FetchStage,
) -> Result<HttpResponse, SkipReason> {
    let res = transport
        .get_with_bearer(url, token)
        .await
        .map_err(|e| SkipReason::Transport {
            stage,
            message: e.to_string(),
        })?;

    if !res.is_success() {
        return Err(SkipReason::Status {
            stage,
            status: res.status,
            body: res.body,
        });
    }
    Ok(res)
}

/// Fetches one playlist's name and first page of tracks and flattens them.
///
/// The track listing is only requested once the playlist details were
/// fetched. Either failing skips the whole playlist.
pub async fn fetch_tracks(
    transport: &dyn HttpTransport,
    config: &Config,
    token: &str,
    playlist_id: &str,
) -> Result<FetchedPlaylist, SkipReason> {
    let details_url = format!("{api}/playlists/{playlist_id}", api = config.api_url);
    let details = get(transport, &details_url, token, FetchStage::Metadata).await?;
    let details: PlaylistDetails =
        serde_json::from_str(&details.body).map_err(|e| SkipReason::Malformed {
            stage: FetchStage::Metadata,
            message: e.to_string(),
        })?;

    let tracks_url = format!("{api}/playlists/{playlist_id}/tracks", api = config.api_url);
    let tracks = get(transport, &tracks_url, token, FetchStage::Tracks).await?;
    let malformed = |e: serde_json::Error| SkipReason::Malformed {
        stage: FetchStage::Tracks,
        message: e.to_string(),
    };
    let raw: RawTrackPayload = serde_json::from_str(&tracks.body).map_err(malformed)?;
    let page: PlaylistTracksPage = serde_json::from_value(raw.clone()).map_err(malformed)?;

    if page.next.is_some() {
        info!(
            "Only the first {} of {} tracks of playlist {} are exported",
            page.items.len(),
            page.total.unwrap_or_default(),
            playlist_id
        );
    }

    let records = flatten_items(playlist_id, &details.name, &page);

    Ok(FetchedPlaylist {
        playlist_id: playlist_id.to_string(),
        playlist_name: details.name,
        raw,
        records,
    })
}

/// Turns a page of playlist items into records, one per item.
///
/// Items without a track object (removed from the catalogue) are dropped.
pub fn flatten_items(
    playlist_id: &str,
    playlist_name: &str,
    page: &PlaylistTracksPage,
) -> Vec<TrackRecord> {
    page.items
        .iter()
        .enumerate()
        .filter_map(|(position, item)| match &item.track {
            Some(track) => Some(TrackRecord::from_track(playlist_id, playlist_name, track)),
            None => {
                warning!(
                    "Playlist {} item {} has no track data, leaving it out",
                    playlist_id,
                    position
                );
                None
            }
        })
        .collect()
}

/// Fetches every playlist in order, one after the other.
///
/// # Arguments
///
/// * `transport` - HTTP collaborator for the API calls
/// * `config` - Provides the API base URL
/// * `token` - Access token valid for the whole batch
/// * `playlist_ids` - Playlists to fetch, in export order
///
/// # Returns
///
/// One [`PlaylistOutcome`] per requested id, in request order. A failing
/// playlist is recorded as skipped with its [`SkipReason`] and the batch
/// continues; nothing is retried.
///
/// # Example
///
/// ```
/// let batch = fetch_batch(&transport, &config, &token, &ids).await;
/// for (playlist_id, reason) in batch.skipped() {
///     warning!("{}: {}", playlist_id, reason);
/// }
/// let (raw, records) = batch.into_export();
/// ```
pub async fn fetch_batch(
    transport: &dyn HttpTransport,
    config: &Config,
    token: &str,
    playlist_ids: &[String],
) -> BatchResult {
    let mut outcomes = Vec::with_capacity(playlist_ids.len());

    for playlist_id in playlist_ids {
        let outcome = match fetch_tracks(transport, config, token, playlist_id).await {
            Ok(playlist) => PlaylistOutcome::Fetched(playlist),
            Err(reason) => {
                warning!("Skipping playlist {}: {}", playlist_id, reason);
                PlaylistOutcome::Skipped {
                    playlist_id: playlist_id.clone(),
                    reason,
                }
            }
        };
        outcomes.push(outcome);
    }

    BatchResult { outcomes }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn page(value: serde_json::Value) -> PlaylistTracksPage {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn first_artist_is_used_when_several_are_listed() {
        let page = page(json!({
            "items": [{
                "track": {
                    "id": "t1",
                    "name": "Under Pressure",
                    "artists": [{ "name": "Queen" }, { "name": "David Bowie" }],
                    "album": { "name": "Hot Space", "release_date": "1982-05-21" },
                    "duration_ms": 248000
                }
            }]
        }));

        let records = flatten_items("p1", "Classics", &page);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].artist, "Queen");
        assert_eq!(records[0].playlist_name, "Classics");
        assert_eq!(records[0].release_date, "1982-05-21");
    }

    #[test]
    fn local_files_keep_their_row_with_empty_ids() {
        let page = page(json!({
            "items": [{
                "track": {
                    "id": null,
                    "name": "demo.mp3",
                    "artists": [],
                    "album": { "name": "", "release_date": null },
                    "duration_ms": 1000
                }
            }]
        }));

        let records = flatten_items("p1", "Local", &page);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].track_id, "");
        assert_eq!(records[0].artist, "");
        assert_eq!(records[0].release_date, "");
    }

    #[test]
    fn items_without_track_are_dropped() {
        let page = page(json!({
            "items": [
                { "track": null },
                {
                    "track": {
                        "id": "t2",
                        "name": "Kept",
                        "artists": [{ "name": "A" }],
                        "album": { "name": "B", "release_date": "2020" },
                        "duration_ms": 1
                    }
                }
            ]
        }));

        let records = flatten_items("p1", "Mixed", &page);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].track_id, "t2");
    }

    #[test]
    fn skip_reason_reports_its_stage() {
        let reason = SkipReason::Status {
            stage: FetchStage::Tracks,
            status: 404,
            body: "not found".into(),
        };
        assert_eq!(reason.stage(), FetchStage::Tracks);
        assert_eq!(reason.to_string(), "failed to fetch tracks (404): not found");
    }
}
