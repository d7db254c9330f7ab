//! Configuration management for the Sporlist service.
//!
//! Configuration is read once at startup from environment variables (optionally
//! seeded from a `.env` file) into an immutable [`Config`] which is then shared
//! with every request handler.
//!
//! The lookup order for the `.env` file is:
//! 1. `.env` in the current working directory
//! 2. `.env` in the local data directory (`sporlist/.env`)
//!
//! Variables already present in the process environment always win.

use std::{env, path::PathBuf};

/// OAuth scopes requested for every token.
pub const SCOPE: &str = "playlist-modify-public playlist-modify-private";

pub const DEFAULT_CACHE_PATH: &str = ".cache-spotify";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8000";

/// Loads environment variables from a `.env` file.
///
/// A `.env` in the working directory takes precedence. When there is none the
/// file under the local data directory is used, creating the directory so that
/// users know where to put it.
///
/// # Returns
///
/// The path of the loaded file, or `None` when no `.env` file exists. A missing
/// file is not an error since all variables may come from the process environment.
///
/// # Errors
///
/// Returns an error string if the data directory cannot be created or an
/// existing `.env` file cannot be parsed.
pub async fn load_env() -> Result<Option<PathBuf>, String> {
    let local = PathBuf::from(".env");
    if local.is_file() {
        dotenv::from_path(&local).map_err(|e| e.to_string())?;
        return Ok(Some(local));
    }

    let path = data_env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if !path.is_file() {
        return Ok(None);
    }

    dotenv::from_path(&path).map_err(|e| e.to_string())?;
    Ok(Some(path))
}

fn data_env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("sporlist/.env");
    path
}

/// Immutable runtime configuration.
///
/// Credentials are not validated here. A missing client id or secret only
/// surfaces once a call against the accounts service fails.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub cache_path: PathBuf,
    pub api_url: String,
    pub accounts_url: String,
    pub server_addr: String,
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// | Variable                | Default                        |
    /// |-------------------------|--------------------------------|
    /// | `SPOTIPY_CLIENT_ID`     | empty                          |
    /// | `SPOTIPY_CLIENT_SECRET` | empty                          |
    /// | `SPOTIPY_REDIRECT_URI`  | empty                          |
    /// | `SPOTIPY_CACHE_PATH`    | `.cache-spotify`               |
    /// | `SPOTIFY_API_URL`       | `https://api.spotify.com/v1`   |
    /// | `SPOTIFY_ACCOUNTS_URL`  | `https://accounts.spotify.com` |
    /// | `SERVER_ADDRESS`        | `127.0.0.1:8000`               |
    pub fn from_env() -> Self {
        Self {
            client_id: env::var("SPOTIPY_CLIENT_ID").unwrap_or_default(),
            client_secret: env::var("SPOTIPY_CLIENT_SECRET").unwrap_or_default(),
            redirect_uri: env::var("SPOTIPY_REDIRECT_URI").unwrap_or_default(),
            scope: SCOPE.to_string(),
            cache_path: env::var("SPOTIPY_CACHE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CACHE_PATH)),
            api_url: env_or("SPOTIFY_API_URL", DEFAULT_API_URL),
            accounts_url: env_or("SPOTIFY_ACCOUNTS_URL", DEFAULT_ACCOUNTS_URL),
            server_addr: env_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
        }
    }

    pub fn authorize_url(&self) -> String {
        format!("{}/authorize", self.accounts_url.trim_end_matches('/'))
    }

    pub fn token_url(&self) -> String {
        format!("{}/api/token", self.accounts_url.trim_end_matches('/'))
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
