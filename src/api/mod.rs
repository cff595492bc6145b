//! # API Module
//!
//! HTTP endpoints of the local web flow.
//!
//! ## Endpoints
//!
//! - `GET /` - login page
//! - `GET /login` - redirect to the Spotify authorization page
//! - `GET /callback` - authorization callback, stores the session
//! - `GET /playlists` - lists playlist ids and redirects to `/tracks`
//! - `GET /tracks?playlist_ids=..` - fetches, exports and returns the records
//! - `GET /authorized` - confirmation page used by `spotex auth`
//! - `GET /health` - status and version
//!
//! Sessions are identified by the `spotex_sid` cookie. Every handler that
//! needs a token redirects to `/login` when the session is unknown or can no
//! longer be refreshed.

use std::sync::Arc;

use axum::http::{HeaderMap, header};

use crate::{
    config::Config,
    management::{ExportSink, SessionId, SessionStore},
    transport::HttpTransport,
    utils,
};

mod callback;
mod health;
mod login;
mod playlists;
mod tracks;

pub use callback::callback;
pub use health::health;
pub use login::{authorized, index, login};
pub use playlists::playlists;
pub use tracks::tracks;

pub const SESSION_COOKIE: &str = "spotex_sid";

/// Shared state of all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub transport: Arc<dyn HttpTransport>,
    pub sessions: SessionStore,
    pub export: ExportSink,
    /// Where `/callback` sends the browser after a successful login.
    pub after_login: &'static str,
}

impl AppState {
    pub fn new(config: Config, transport: Arc<dyn HttpTransport>) -> Self {
        let export = ExportSink::new(&config.export_dir);
        Self {
            config: Arc::new(config),
            transport,
            sessions: SessionStore::new(),
            export,
            after_login: "/playlists",
        }
    }

    pub fn with_after_login(mut self, location: &'static str) -> Self {
        self.after_login = location;
        self
    }
}

/// Session id carried by the request, if it has a well-formed one.
pub fn session_id(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|cookie| utils::cookie_value(cookie, SESSION_COOKIE))
        .and_then(SessionId::parse)
}

pub fn session_cookie(id: &SessionId) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}
