use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{config::Config, info, spotify, types::AuthState, warning};

pub async fn auth(config: Arc<Config>, shared_state: Arc<Mutex<Option<AuthState>>>) {
    if config.client_id.is_empty() || config.client_secret.is_empty() {
        warning!(
            "SPOTIPY_CLIENT_ID or SPOTIPY_CLIENT_SECRET is not set, the token exchange will fail"
        );
    }

    info!("Requesting scopes: {}", config.scope);
    spotify::auth::auth(config, shared_state).await;
}
