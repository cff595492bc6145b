//! Error taxonomy.
//!
//! Every failure is either surfaced once to the caller or, for a single
//! playlist inside a batch, recorded as a [`crate::spotify::tracks::SkipReason`]
//! and skipped. Nothing is retried.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::warning;

/// Failure of the HTTP collaborator before any status code was received.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("request failed: {0}")]
    Other(String),
}

/// No usable access token and no way to obtain one; restart authorization.
#[derive(Debug, Error)]
pub enum AuthRequired {
    #[error("no authenticated session")]
    NoSession,
    #[error("access token expired and the session has no refresh token")]
    NoRefreshToken,
    #[error("token refresh rejected with status {status}")]
    RefreshRejected { status: u16, body: String },
    #[error("token refresh failed: {0}")]
    RefreshFailed(String),
}

/// The authorization callback or the code exchange was malformed or rejected.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The authorization server redirected back with an `error` parameter.
    #[error("{0}")]
    Denied(String),
    #[error("Missing authorization code")]
    MalformedCallback,
    #[error("Failed to get token")]
    Rejected { status: u16, body: String },
    #[error("Failed to get token: {0}")]
    MalformedResponse(String),
    #[error("Failed to get token: {0}")]
    Transport(#[from] TransportError),
}

/// A required upstream call failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to fetch {resource}")]
    Status {
        resource: &'static str,
        status: u16,
        body: String,
    },
    #[error("Failed to fetch {resource}: {source}")]
    Transport {
        resource: &'static str,
        #[source]
        source: TransportError,
    },
    #[error("Failed to decode {resource}: {source}")]
    Decode {
        resource: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// Status code to relay to the caller: the upstream one when there is one.
    pub fn status_code(&self) -> StatusCode {
        match self {
            FetchError::Status { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            FetchError::Transport { .. } | FetchError::Decode { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("export json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("export csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Error type of the HTTP handlers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    AuthRequired(#[from] AuthRequired),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::AuthRequired(reason) => {
                warning!("No access token available ({}), redirecting to login.", reason);
                return Redirect::to("/login").into_response();
            }
            AppError::Auth(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::Fetch(e) => (e.status_code(), e.to_string()),
            AppError::Export(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
