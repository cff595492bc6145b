use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    api::{AppState, session_cookie, session_id},
    error::AppError,
    management::SessionId,
    spotify, success,
};

/// Completes the authorization-code flow.
///
/// On success the session is stored under the caller's session id (a new id
/// is issued when the request has none) and the browser is sent on to
/// `state.after_login`.
pub async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let session =
        spotify::auth::handle_callback(state.transport.as_ref(), &state.config, &params).await?;

    let id = session_id(&headers).unwrap_or_else(SessionId::generate);
    state.sessions.insert(id.clone(), session).await;
    success!("Authorization completed for session {}", id);

    Ok((
        [(header::SET_COOKIE, session_cookie(&id))],
        Redirect::to(state.after_login),
    )
        .into_response())
}
