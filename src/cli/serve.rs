use std::sync::Arc;

use crate::{
    api::AppState, config::Config, error, info, server::start_api_server,
    transport::ReqwestTransport,
};

pub async fn serve(config: Config) {
    let transport = match ReqwestTransport::new(config.http_timeout) {
        Ok(t) => t,
        Err(e) => error!("Failed to build HTTP client: {}", e),
    };

    info!(
        "Exports are written to {}",
        config.export_dir.display()
    );

    let state = AppState::new(config, Arc::new(transport));
    if let Err(e) = start_api_server(state).await {
        error!("Server stopped: {}", e);
    }
}
