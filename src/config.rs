//! Configuration management for spotex.
//!
//! Configuration is read from environment variables. Before reading them,
//! [`load_env`] merges two optional `.env` files into the process environment:
//!
//! 1. `.env` in the current working directory
//! 2. `.env` in the local data directory (`~/.local/share/spotex/.env` on Linux)
//!
//! Variables already present in the environment always win, `dotenv` never
//! overrides them. Everything except the client credentials has a default
//! matching the public Spotify endpoints.

use std::{env, path::PathBuf, time::Duration};

use thiserror::Error;
use url::Url;

pub const DEFAULT_SCOPE: &str = "user-read-private user-read-email playlist-read-private";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:5000/callback";
pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:5000";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{var} is not a valid URL: {source}")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("{var} has an invalid value: {value}")]
    InvalidValue { var: &'static str, value: String },
    #[error("Failed to load {path}: {message}")]
    EnvFile { path: PathBuf, message: String },
}

/// Runtime configuration of the OAuth client, the upstream API and the export.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    pub auth_url: Url,
    pub token_url: Url,
    /// API base without a trailing slash, e.g. `https://api.spotify.com/v1`.
    pub api_url: String,
    pub show_dialog: bool,
    pub server_addr: String,
    pub export_dir: PathBuf,
    pub http_timeout: Duration,
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated like unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));
        let url = |key: &'static str, default: &str| {
            let raw = get(key).unwrap_or_else(|| default.to_string());
            Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl { var: key, source })
        };

        let scopes = get("SPOTIFY_API_AUTH_SCOPE")
            .unwrap_or_else(|| DEFAULT_SCOPE.to_string())
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let api_url = url("SPOTIFY_API_URL", DEFAULT_API_URL)?
            .as_str()
            .trim_end_matches('/')
            .to_string();

        let show_dialog = match get("SPOTIFY_SHOW_DIALOG") {
            None => true,
            Some(v) => parse_bool(&v).ok_or(ConfigError::InvalidValue {
                var: "SPOTIFY_SHOW_DIALOG",
                value: v,
            })?,
        };

        let http_timeout = match get("SPOTEX_HTTP_TIMEOUT_SECS") {
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            Some(v) => v
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidValue {
                    var: "SPOTEX_HTTP_TIMEOUT_SECS",
                    value: v,
                })?,
        };

        Ok(Self {
            client_id: required("SPOTIFY_API_AUTH_CLIENT_ID")?,
            client_secret: required("SPOTIFY_API_AUTH_CLIENT_SECRET")?,
            redirect_uri: get("SPOTIFY_API_REDIRECT_URI")
                .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
            scopes,
            auth_url: url("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL)?,
            token_url: url("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL)?,
            api_url,
            show_dialog,
            server_addr: get("SERVER_ADDRESS").unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string()),
            export_dir: get("SPOTEX_EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            http_timeout,
        })
    }

    /// Space separated scope string as sent to the authorization server.
    pub fn scope(&self) -> String {
        self.scopes.join(" ")
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Location of the per-user data directory, e.g. `~/.local/share/spotex`.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotex");
    path
}

/// Loads `.env` files from the working directory and the local data directory.
///
/// Missing files are skipped; a file that exists but cannot be parsed is an
/// error.
pub async fn load_env() -> Result<(), ConfigError> {
    let data_dir = data_dir();
    async_fs::create_dir_all(&data_dir)
        .await
        .map_err(|e| ConfigError::EnvFile {
            path: data_dir.clone(),
            message: e.to_string(),
        })?;

    for path in [PathBuf::from(".env"), data_dir.join(".env")] {
        if !path.is_file() {
            continue;
        }
        dotenv::from_path(&path).map_err(|e| ConfigError::EnvFile {
            path: path.clone(),
            message: e.to_string(),
        })?;
    }

    Ok(())
}
