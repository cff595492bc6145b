use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabled::Tabled;

/// Token state of one authenticated user.
///
/// `expires_at` is the instant at which `access_token` stops being valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Instant `expires_in` seconds after `now`, or `None` when the lifetime does
/// not fit in a timestamp.
pub fn expiry_after(now: DateTime<Utc>, expires_in: i64) -> Option<DateTime<Utc>> {
    now.checked_add_signed(Duration::try_seconds(expires_in)?)
}

impl Session {
    /// Session for a freshly issued token, or `None` when `expires_in` is out
    /// of range.
    pub fn issued(
        access_token: String,
        refresh_token: Option<String>,
        expires_in: i64,
        scope: Option<String>,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        Some(Self {
            access_token,
            refresh_token,
            expires_at: expiry_after(now, expires_in)?,
            scope,
        })
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Applies a refresh grant in place. The refresh token only changes when
    /// the server rotated it.
    ///
    /// Returns `None` and leaves the session as it was when `expires_in` is
    /// out of range.
    pub fn apply_refresh(&mut self, token: TokenResponse, now: DateTime<Utc>) -> Option<()> {
        let expires_at = expiry_after(now, token.expires_in)?;
        self.access_token = token.access_token;
        self.expires_at = expires_at;
        if let Some(rotated) = token.refresh_token {
            self.refresh_token = Some(rotated);
        }
        if token.scope.is_some() {
            self.scope = token.scope;
        }
        Some(())
    }
}

/// Body of a successful `/api/token` response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_in: i64,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Opaque per-playlist track listing, kept verbatim for the raw export.
pub type RawTrackPayload = Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistRef {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistsPage {
    pub items: Vec<PlaylistRef>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistDetails {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksPage {
    pub items: Vec<PlaylistItem>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    /// `null` for tracks that were removed from the catalogue.
    pub track: Option<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// `null` for local files.
    pub id: Option<String>,
    pub name: String,
    pub artists: Vec<TrackArtist>,
    pub album: TrackAlbum,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackArtist {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackAlbum {
    pub name: String,
    pub release_date: Option<String>,
}

/// One track merged with the playlist it was listed in.
///
/// Field order is the column order of the CSV export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Tabled)]
pub struct TrackRecord {
    pub playlist_id: String,
    pub playlist_name: String,
    pub artist: String,
    pub track_name: String,
    pub track_id: String,
    pub album: String,
    pub release_date: String,
    pub duration_ms: u64,
}

impl TrackRecord {
    pub const FIELDS: [&'static str; 8] = [
        "playlist_id",
        "playlist_name",
        "artist",
        "track_name",
        "track_id",
        "album",
        "release_date",
        "duration_ms",
    ];

    pub fn from_track(playlist_id: &str, playlist_name: &str, track: &Track) -> Self {
        Self {
            playlist_id: playlist_id.to_string(),
            playlist_name: playlist_name.to_string(),
            artist: track
                .artists
                .first()
                .map(|a| a.name.clone())
                .unwrap_or_default(),
            track_name: track.name.clone(),
            track_id: track.id.clone().unwrap_or_default(),
            album: track.album.name.clone(),
            release_date: track.album.release_date.clone().unwrap_or_default(),
            duration_ms: track.duration_ms,
        }
    }
}
