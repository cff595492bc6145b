use crate::{
    config::Config,
    error::FetchError,
    info,
    transport::HttpTransport,
    types::PlaylistsPage,
    warning,
};

const RESOURCE: &str = "playlists";

/// Lists the ids of the current user's playlists.
///
/// Only the first page of `GET /me/playlists` is read; `next` is not
/// followed. Ids are returned in the order the API lists them.
pub async fn list_playlist_ids(
    transport: &dyn HttpTransport,
    config: &Config,
    token: &str,
) -> Result<Vec<String>, FetchError> {
    let url = format!("{api}/me/playlists", api = config.api_url);

    let res = transport
        .get_with_bearer(&url, token)
        .await
        .map_err(|source| FetchError::Transport {
            resource: RESOURCE,
            source,
        })?;

    if !res.is_success() {
        warning!("Failed to fetch playlists: {}", res.body);
        return Err(FetchError::Status {
            resource: RESOURCE,
            status: res.status,
            body: res.body,
        });
    }

    let page: PlaylistsPage =
        serde_json::from_str(&res.body).map_err(|source| FetchError::Decode {
            resource: RESOURCE,
            source,
        })?;

    if page.next.is_some() {
        info!(
            "Only the first {} of {} playlists are exported",
            page.items.len(),
            page.total.unwrap_or_default()
        );
    }

    let ids: Vec<String> = page.items.into_iter().map(|p| p.id).collect();
    info!("Fetched playlists: {:?}", ids);
    Ok(ids)
}
