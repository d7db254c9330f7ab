use std::{sync::Arc, time::Duration};

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, distr::Alphanumeric};
use reqwest::{Client, Url};
use tokio::sync::Mutex;

use crate::{
    Res, config::Config, error, error::Error, management::TokenManager, server, success,
    types::{AuthState, Token, TokenResponse},
    warning,
};

use super::{SpotifyClient, parse_response};

/// Hands out authenticated [`SpotifyClient`]s backed by the token cache.
///
/// This is the only place that knows about tokens; request handlers just ask
/// for a client. Credentials are not checked up front, a bad client id or an
/// empty cache shows up as an error from [`Authenticator::authenticate`].
#[derive(Debug, Clone)]
pub struct Authenticator {
    config: Arc<Config>,
}

impl Authenticator {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Loads the cached token, refreshing it when needed, and returns a client
    /// bound to it.
    pub async fn authenticate(&self) -> Res<SpotifyClient> {
        let mut manager = TokenManager::load(&self.config.cache_path).await?;
        let access_token = manager.get_valid_token(&self.config).await?;

        Ok(SpotifyClient::new(&self.config.api_url, access_token))
    }
}

/// Runs the interactive authorization code flow and writes the token cache.
///
/// 1. **State**: Generates a random `state` value for the callback check
/// 2. **Server Start**: Starts a callback server on the redirect URI's host and port
/// 3. **Browser Launch**: Opens the authorization URL in the default browser
/// 4. **Callback Handling**: The callback exchanges the code for a token
/// 5. **Token Persistence**: The token is written to the configured cache path
///
/// Unrecoverable failures (unparsable redirect URI, timeout, cache write
/// failure) terminate the program with an error message.
pub async fn auth(config: Arc<Config>, shared_state: Arc<Mutex<Option<AuthState>>>) {
    let state = generate_state();

    let redirect = match Url::parse(&config.redirect_uri) {
        Ok(url) => url,
        Err(e) => error!(
            "Invalid SPOTIPY_REDIRECT_URI '{}': {}",
            config.redirect_uri, e
        ),
    };

    let auth_url = match authorize_url(&config, &state) {
        Ok(url) => url,
        Err(e) => error!("Failed to build authorization URL: {}", e),
    };

    {
        let mut lock = shared_state.lock().await;
        *lock = Some(AuthState::new(state.clone()));
    }

    let server_state = Arc::clone(&shared_state);
    let server_config = Arc::clone(&config);
    tokio::spawn(async move {
        server::start_callback_server(server_config, redirect, server_state).await;
    });

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    match wait_for_token(shared_state).await {
        Ok(token) => {
            let token_manager = TokenManager::new(token, config.cache_path.clone());
            if let Err(e) = token_manager.persist().await {
                error!("Failed to save token to cache: {}", e);
            }

            success!(
                "Authentication successful! Token cached at {}",
                config.cache_path.display()
            );
        }
        Err(reason) => {
            error!("Authentication failed: {}", reason);
        }
    }
}

/// Polls the shared state until the callback stored a token or recorded a
/// failure, for at most 60 seconds.
pub async fn wait_for_token(
    shared_state: Arc<Mutex<Option<AuthState>>>,
) -> Result<Token, String> {
    use std::time::Instant;

    let max_wait = Duration::from_secs(60);
    let start = Instant::now();

    let pb = ProgressBar::new_spinner();
    pb.set_message("Waiting for authorization in the browser...");
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(auth_state) = lock.as_ref() {
            if let Some(token) = &auth_state.token {
                pb.finish_and_clear();
                return Ok(token.clone());
            }
            if let Some(reason) = &auth_state.failed {
                pb.finish_and_clear();
                return Err(reason.clone());
            }
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    pb.finish_and_clear();
    Err("timed out waiting for the authorization callback".to_string())
}

pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

/// Builds the URL the user has to visit to grant access.
pub fn authorize_url(config: &Config, state: &str) -> Res<String> {
    let url = Url::parse_with_params(
        &config.authorize_url(),
        &[
            ("client_id", config.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("scope", config.scope.as_str()),
            ("state", state),
        ],
    )
    .map_err(|e| Error::Token(e.to_string()))?;

    Ok(url.to_string())
}

/// Exchanges an authorization code for a token.
pub async fn exchange_code(config: &Config, code: &str) -> Res<Token> {
    request_token(
        config,
        &[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", config.redirect_uri.as_str()),
        ],
    )
    .await
}

/// Exchanges a refresh token for a fresh access token.
///
/// The returned token has no refresh token when the accounts service did not
/// rotate it; the caller keeps the previous one in that case.
pub async fn refresh_token(config: &Config, refresh_token: &str) -> Res<Token> {
    request_token(
        config,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ],
    )
    .await
}

async fn request_token(config: &Config, form: &[(&str, &str)]) -> Res<Token> {
    let response = Client::new()
        .post(config.token_url())
        .basic_auth(&config.client_id, Some(&config.client_secret))
        .form(form)
        .send()
        .await?;

    let res: TokenResponse = parse_response(response).await?;
    Ok(token_from_response(res, Utc::now().timestamp() as u64))
}

pub fn token_from_response(res: TokenResponse, now: u64) -> Token {
    Token {
        access_token: res.access_token,
        token_type: res.token_type,
        expires_in: res.expires_in,
        scope: res.scope,
        expires_at: now + res.expires_in,
        refresh_token: res.refresh_token,
    }
}
