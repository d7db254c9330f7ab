use axum::{
    Extension, Router,
    routing::{get, post},
};
use reqwest::Url;
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use crate::{Res, api, config::Config, error, error::Error, types::AuthState};

/// Builds the router of the playlist service.
pub fn router(config: Arc<Config>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/create-playlist", post(api::create_playlist))
        .route(
            "/create-or-update-playlist",
            post(api::create_or_update_playlist),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(config)
}

/// Serves [`router`] on the configured address until the process stops.
pub async fn start_api_server(config: Arc<Config>) -> Res<()> {
    let addr = SocketAddr::from_str(&config.server_addr).map_err(|e| {
        Error::Config(format!(
            "failed to parse server address '{}': {}",
            config.server_addr, e
        ))
    })?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router(config)).await?;
    Ok(())
}

/// Builds the router answering the OAuth redirect on `path`.
pub fn callback_router(
    config: Arc<Config>,
    path: &str,
    state: Arc<Mutex<Option<AuthState>>>,
) -> Router {
    Router::new()
        .route(path, get(api::callback))
        .layer(Extension(state))
        .layer(Extension(config))
}

/// Serves the OAuth callback on the host, port and path of `redirect`.
///
/// Used by `sporlist auth` only; the task is dropped together with the runtime
/// once the token has been stored.
pub async fn start_callback_server(
    config: Arc<Config>,
    redirect: Url,
    state: Arc<Mutex<Option<AuthState>>>,
) {
    let host = redirect.host_str().unwrap_or("127.0.0.1");
    let port = redirect.port_or_known_default().unwrap_or(80);
    let path = match redirect.path() {
        "" => "/",
        path => path,
    };

    let app = callback_router(config, path, state);

    let listener = match tokio::net::TcpListener::bind((host, port)).await {
        Ok(listener) => listener,
        Err(e) => error!("Failed to bind callback server on {}:{}: {}", host, port, e),
    };

    if let Err(e) = axum::serve(listener, app).await {
        error!("Callback server stopped: {}", e);
    }
}
