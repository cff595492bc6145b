//! # Spotify Integration Module
//!
//! Calls against the Spotify accounts service and the Web API. Every
//! function takes the HTTP collaborator and the configuration explicitly and
//! issues its requests one after the other; nothing here retries.
//!
//! ```text
//! Web handlers / CLI
//!          ↓
//! spotify
//!     ├── auth       authorize URL, code exchange, callback, refresh grant
//!     ├── playlists  GET /me/playlists (first page)
//!     └── tracks     GET /playlists/{id} + /playlists/{id}/tracks, flattening
//!          ↓
//! transport::HttpTransport
//! ```
//!
//! ## API Coverage
//!
//! - `POST /api/token` - `authorization_code` and `refresh_token` grants
//! - `GET /me/playlists` - ids of the user's playlists
//! - `GET /playlists/{id}` - playlist name
//! - `GET /playlists/{id}/tracks` - track listing
//!
//! Only the first page of each listing is read.

pub mod auth;
pub mod playlists;
pub mod tracks;
