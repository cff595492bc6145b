use std::{net::SocketAddr, str::FromStr};

use axum::{Router, routing::get};

use crate::{Res, api, api::AppState, info};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::index))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/playlists", get(api::playlists))
        .route("/tracks", get(api::tracks))
        .route("/authorized", get(api::authorized))
        .route("/health", get(api::health))
        .with_state(state)
}

pub async fn start_api_server(state: AppState) -> Res<()> {
    let addr = SocketAddr::from_str(&state.config.server_addr)
        .map_err(|e| format!("Failed to parse server address: {}", e))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
