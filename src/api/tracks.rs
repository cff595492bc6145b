use axum::{
    Json,
    extract::{RawQuery, State},
    http::HeaderMap,
};

use crate::{
    api::{AppState, session_id},
    error::AppError,
    info, spotify,
    types::TrackRecord,
    utils,
};

/// Fetches the tracks of the requested playlists, writes the export and
/// returns the flattened records.
pub async fn tracks(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<TrackRecord>>, AppError> {
    let transport = state.transport.as_ref();
    let token = state
        .sessions
        .valid_token(session_id(&headers).as_ref(), transport, &state.config)
        .await?;

    let playlist_ids = utils::parse_playlist_ids(query.as_deref());
    let batch =
        spotify::tracks::fetch_batch(transport, &state.config, &token, &playlist_ids).await;
    let (raw, records) = batch.into_export();

    state.export.persist(&raw, &records).await?;
    info!(
        "Saved {} records to {}",
        records.len(),
        state.export.records_path().display()
    );

    Ok(Json(records))
}
