use std::sync::Arc;

use crate::{config::Config, error, info, server, warning};

pub async fn serve(config: Arc<Config>) {
    if !config.cache_path.is_file() {
        warning!(
            "No token cache at {}, requests will fail until you run `sporlist auth`",
            config.cache_path.display()
        );
    }

    info!("Starting sporlist on {}", config.server_addr);
    if let Err(e) = server::start_api_server(config).await {
        error!("Server stopped: {}", e);
    }
}
