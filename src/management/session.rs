use std::{collections::HashMap, fmt, sync::Arc};

use tokio::sync::Mutex;

use crate::{
    config::Config, error::AuthRequired, management::TokenManager, transport::HttpTransport,
    types::Session, utils,
};

/// Opaque identifier of one browser session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        SessionId(utils::generate_session_id())
    }

    /// Accepts identifiers that look like ones we issued.
    pub fn parse(raw: &str) -> Option<Self> {
        let valid = raw.len() == utils::SESSION_ID_LEN
            && raw.chars().all(|c| c.is_ascii_alphanumeric());
        valid.then(|| SessionId(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Token managers keyed by session id.
///
/// Each entry has its own lock, so a refresh for one session never waits
/// on another session.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<SessionId, Arc<Mutex<TokenManager>>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a freshly authorized session, replacing any previous one.
    pub async fn insert(&self, id: SessionId, session: Session) {
        let entry = {
            let mut sessions = self.sessions.lock().await;
            Arc::clone(
                sessions
                    .entry(id)
                    .or_insert_with(|| Arc::new(Mutex::new(TokenManager::empty()))),
            )
        };
        entry.lock().await.replace(session);
    }

    pub async fn manager(&self, id: &SessionId) -> Option<Arc<Mutex<TokenManager>>> {
        self.sessions.lock().await.get(id).cloned()
    }

    pub async fn session(&self, id: &SessionId) -> Option<Session> {
        let manager = self.manager(id).await?;
        let manager = manager.lock().await;
        manager.session().cloned()
    }

    pub async fn ids(&self) -> Vec<SessionId> {
        self.sessions.lock().await.keys().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Valid access token for `id`; unknown ids need authorization.
    pub async fn valid_token(
        &self,
        id: Option<&SessionId>,
        transport: &dyn HttpTransport,
        config: &Config,
    ) -> Result<String, AuthRequired> {
        let id = id.ok_or(AuthRequired::NoSession)?;
        let manager = self.manager(id).await.ok_or(AuthRequired::NoSession)?;
        let mut manager = manager.lock().await;
        manager.get_valid_token(transport, config).await
    }
}
