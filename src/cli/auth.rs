use std::{sync::Arc, time::Duration};

use crate::{
    api::AppState,
    config::Config,
    error,
    management::{SessionStore, TokenManager},
    server::start_api_server,
    spotify, success,
    transport::ReqwestTransport,
    types::Session,
    warning,
};

/// Runs the authorization flow from the terminal and caches the session.
///
/// The callback server is started in the background, the authorization page
/// is opened in the browser, and the first session stored by `/callback`
/// within 60 seconds is written to [`TokenManager::cache_path`].
pub async fn auth(config: Config) {
    let transport = match ReqwestTransport::new(config.http_timeout) {
        Ok(t) => t,
        Err(e) => error!("Failed to build HTTP client: {}", e),
    };

    let state = AppState::new(config, Arc::new(transport)).with_after_login("/authorized");

    let server_state = state.clone();
    tokio::spawn(async move {
        if let Err(e) = start_api_server(server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    let auth_url = spotify::auth::build_authorize_url(&state.config);
    if webbrowser::open(auth_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    match wait_for_session(&state.sessions).await {
        Some(session) => {
            let path = TokenManager::cache_path();
            if let Err(e) = TokenManager::new(session).persist(&path).await {
                error!("Failed to save session to cache: {}", e);
            }
            success!("Authentication successful!");
        }
        None => {
            error!("Authentication failed or timed out.");
        }
    }
}

async fn wait_for_session(sessions: &SessionStore) -> Option<Session> {
    use std::time::Instant;

    let max_wait = Duration::from_secs(60);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        for id in sessions.ids().await {
            if let Some(session) = sessions.session(&id).await {
                return Some(session);
            }
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}
