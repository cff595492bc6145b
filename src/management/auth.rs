use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::{
    config::{self, Config},
    error::AuthRequired,
    spotify,
    transport::HttpTransport,
    types::Session,
};

/// Owns the token state of one authenticated user and hands out access
/// tokens that are valid at the time of the call.
///
/// The web flow keeps one manager per browser session in a
/// [`SessionStore`](crate::management::SessionStore); the CLI keeps a single
/// one cached at [`TokenManager::cache_path`].
///
/// # Example
///
/// ```
/// let mut token_mgr = TokenManager::load(&TokenManager::cache_path()).await?;
/// let token = token_mgr.get_valid_token(&transport, &config).await?;
/// // the token may have been refreshed
/// token_mgr.persist(&TokenManager::cache_path()).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct TokenManager {
    session: Option<Session>,
}

impl TokenManager {
    pub fn new(session: Session) -> Self {
        TokenManager {
            session: Some(session),
        }
    }

    pub fn empty() -> Self {
        TokenManager { session: None }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Replaces the whole session, e.g. after a new authorization.
    pub fn replace(&mut self, session: Session) {
        self.session = Some(session);
    }

    pub async fn get_valid_token(
        &mut self,
        transport: &dyn HttpTransport,
        config: &Config,
    ) -> Result<String, AuthRequired> {
        self.get_valid_token_at(Utc::now(), transport, config).await
    }

    /// Returns an access token valid at `now`.
    ///
    /// # Token Lifecycle
    ///
    /// 1. **Fast path**: the stored token has not expired (`now <= expires_at`)
    ///    and is returned as is, without any network call
    /// 2. **Slow path**: exactly one refresh request; the access token and
    ///    expiry are replaced, the refresh token only when the server rotated it
    ///
    /// # Errors
    ///
    /// - [`AuthRequired::NoSession`] when nothing was ever stored
    /// - [`AuthRequired::NoRefreshToken`] when the token expired and cannot
    ///   be renewed
    /// - [`AuthRequired::RefreshRejected`] or [`AuthRequired::RefreshFailed`]
    ///   when the refresh did not produce a usable token
    ///
    /// The stored session is left exactly as it was on every error.
    pub async fn get_valid_token_at(
        &mut self,
        now: DateTime<Utc>,
        transport: &dyn HttpTransport,
        config: &Config,
    ) -> Result<String, AuthRequired> {
        let session = self.session.as_mut().ok_or(AuthRequired::NoSession)?;

        if !session.is_expired_at(now) {
            return Ok(session.access_token.clone());
        }

        let refresh_token = session
            .refresh_token
            .clone()
            .ok_or(AuthRequired::NoRefreshToken)?;

        let token = spotify::auth::refresh_token(transport, config, &refresh_token).await?;
        let expires_in = token.expires_in;
        session.apply_refresh(token, now).ok_or_else(|| {
            AuthRequired::RefreshFailed(format!("expires_in out of range: {expires_in}"))
        })?;

        Ok(session.access_token.clone())
    }

    /// Reads a session cached by [`TokenManager::persist`].
    ///
    /// # Errors
    ///
    /// Returns a message when the file is missing or not a cached session;
    /// the CLI asks the user to run `spotex auth` in that case.
    pub async fn load(path: &Path) -> Result<Self, String> {
        let content = async_fs::read_to_string(path)
            .await
            .map_err(|e| e.to_string())?;
        let session: Session = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        Ok(Self::new(session))
    }

    /// Writes the session as pretty JSON to `path`, creating parent
    /// directories as needed. An empty manager has nothing to write.
    pub async fn persist(&self, path: &Path) -> Result<(), String> {
        let Some(session) = &self.session else {
            return Err("no session to persist".to_string());
        };

        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(session).map_err(|e| e.to_string())?;
        async_fs::write(path, json).await.map_err(|e| e.to_string())
    }

    /// Default cache location of the CLI session.
    pub fn cache_path() -> PathBuf {
        let mut path = config::data_dir();
        path.push("cache/session.json");
        path
    }
}
