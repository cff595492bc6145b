use tabled::Table;

use crate::{
    config::Config,
    error,
    management::{ExportSink, TokenManager},
    spotify, success,
    transport::ReqwestTransport,
    warning,
};

use super::spinner;

/// Exports all playlists of the cached session and prints the records.
pub async fn export(config: Config) {
    let transport = match ReqwestTransport::new(config.http_timeout) {
        Ok(t) => t,
        Err(e) => error!("Failed to build HTTP client: {}", e),
    };

    let cache_path = TokenManager::cache_path();
    let mut token_mgr = match TokenManager::load(&cache_path).await {
        Ok(t) => t,
        Err(e) => {
            error!(
                "Failed to load session. Please run spotex auth\n Error: {}",
                e
            );
        }
    };

    let pb = spinner("Fetching playlists...");

    let token = match token_mgr.get_valid_token(&transport, &config).await {
        Ok(token) => token,
        Err(e) => {
            pb.finish_and_clear();
            error!("{}. Please run spotex auth", e);
        }
    };

    // the token may have been refreshed
    if let Err(e) = token_mgr.persist(&cache_path).await {
        warning!("Failed to update cached session: {}", e);
    }

    let playlist_ids =
        match spotify::playlists::list_playlist_ids(&transport, &config, &token).await {
            Ok(ids) => ids,
            Err(e) => {
                pb.finish_and_clear();
                error!("{} (status {})", e, e.status_code());
            }
        };

    pb.set_message(format!(
        "Fetching tracks of {} playlists...",
        playlist_ids.len()
    ));
    let batch = spotify::tracks::fetch_batch(&transport, &config, &token, &playlist_ids).await;
    pb.finish_and_clear();

    let skipped = batch.skipped().count();
    let (raw, records) = batch.into_export();

    let sink = ExportSink::new(&config.export_dir);
    if let Err(e) = sink.persist(&raw, &records).await {
        error!("Failed to write export: {}", e);
    }

    println!("{}", Table::new(&records));
    success!(
        "Exported {} tracks from {} playlists to {}",
        records.len(),
        raw.len(),
        sink.records_path().display()
    );
    if skipped > 0 {
        warning!("{} playlists were skipped", skipped);
    }
}

/// Prints the records of the last export.
pub async fn records(config: Config) {
    let sink = ExportSink::new(&config.export_dir);
    match sink.load_records().await {
        Ok(records) => println!("{}", Table::new(&records)),
        Err(e) => warning!(
            "Failed to read {}. Run spotex export first.\n Error: {}",
            sink.records_path().display(),
            e
        ),
    }
}
