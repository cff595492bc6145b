use axum::{extract::State, http::HeaderMap, response::Redirect};

use crate::{
    api::{AppState, session_id},
    error::AppError,
    spotify, utils,
};

pub async fn playlists(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Redirect, AppError> {
    let transport = state.transport.as_ref();
    let token = state
        .sessions
        .valid_token(session_id(&headers).as_ref(), transport, &state.config)
        .await?;

    let ids = spotify::playlists::list_playlist_ids(transport, &state.config, &token).await?;

    Ok(Redirect::to(&utils::tracks_location(&ids)))
}
