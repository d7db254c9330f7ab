use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::{Res, config::Config, error::Error, spotify, types::Token};

/// Tokens expiring within this many seconds are refreshed before use.
pub const EXPIRY_MARGIN_SECS: u64 = 60;

/// Owns the token cache file.
///
/// The cache is read and written on every request without locking; two
/// requests refreshing at the same time simply both write the file.
pub struct TokenManager {
    token: Token,
    path: PathBuf,
}

impl TokenManager {
    pub fn new(token: Token, path: impl Into<PathBuf>) -> Self {
        TokenManager {
            token,
            path: path.into(),
        }
    }

    pub async fn load(path: &Path) -> Res<Self> {
        let content = async_fs::read_to_string(path).await.map_err(|e| {
            Error::Token(format!(
                "cannot read token cache {}: {}. Run `sporlist auth` first",
                path.display(),
                e
            ))
        })?;
        let token: Token = serde_json::from_str(&content)?;

        Ok(Self {
            token,
            path: path.to_path_buf(),
        })
    }

    pub async fn persist(&self) -> Res<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.token)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Returns an access token that is valid for at least [`EXPIRY_MARGIN_SECS`].
    ///
    /// An expiring token is refreshed and written back to the cache. When the
    /// accounts service does not rotate the refresh token the previous one is
    /// kept.
    pub async fn get_valid_token(&mut self, config: &Config) -> Res<String> {
        if self.is_expired() {
            let Some(refresh) = self.token.refresh_token.clone() else {
                return Err(Error::Token(
                    "access token expired and no refresh token is cached".to_string(),
                ));
            };

            tracing::debug!("refreshing access token");
            let mut token = spotify::auth::refresh_token(config, &refresh).await?;
            if token.refresh_token.is_none() {
                token.refresh_token = Some(refresh);
            }

            self.token = token;
            self.persist().await?;
        }

        Ok(self.token.access_token.clone())
    }

    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now + EXPIRY_MARGIN_SECS >= self.token.expires_at
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }
}
