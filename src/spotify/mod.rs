//! # Spotify Integration Module
//!
//! Thin client over the parts of the Spotify Web API this service needs. All
//! calls are plain request/response round trips awaited one after another; no
//! retries or backoff are applied, so any failure reaches the caller as an
//! [`Error`].
//!
//! ## Endpoints
//!
//! - `GET /me` - profile of the user owning the token ([`user`])
//! - `GET /search` - top track for a free-text query ([`search`])
//! - `GET /me/playlists` - the user's playlists, paged ([`playlist`])
//! - `POST /users/{user_id}/playlists` - create a playlist ([`playlist`])
//! - `POST /playlists/{playlist_id}/tracks` - append tracks ([`playlist`])
//! - `POST /api/token` - code exchange and token refresh ([`auth`])
//!
//! ## Usage
//!
//! ```rust,ignore
//! let client = Authenticator::new(config).authenticate().await?;
//! let user = client.current_user().await?;
//! let uri = client.search_track("Bohemian Rhapsody").await?;
//! ```

pub mod auth;
pub mod playlist;
pub mod search;
pub mod user;

use reqwest::{Client, Response, Url};
use serde::{Serialize, de::DeserializeOwned};

use crate::{Res, error::Error, types::ApiErrorResponse};

/// Authenticated handle to the Web API.
///
/// Holds a bearer token that was valid when the handle was created. The handle
/// lives for one request only; token refresh happens in [`auth::Authenticator`].
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    access_token: String,
}

impl SpotifyClient {
    pub fn new(api_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Res<Url> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| Error::Config(format!("invalid API URL '{}': {}", self.api_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("API URL '{}' cannot be a base", self.api_url)))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    async fn get<T, Q>(&self, segments: &[&str], query: &Q) -> Res<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self
            .http
            .get(self.url(segments)?)
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .await?;

        parse_response(response).await
    }

    async fn post<T, B>(&self, segments: &[&str], body: &B) -> Res<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .http
            .post(self.url(segments)?)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await?;

        parse_response(response).await
    }
}

/// Decodes a successful reply or turns a non-2xx reply into [`Error::Api`].
///
/// Web API errors carry `{"error": {"status", "message"}}`; other bodies
/// (e.g. from the accounts service) are passed through as text.
pub(crate) async fn parse_response<T: DeserializeOwned>(response: Response) -> Res<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
        Ok(err) if !err.error.message.is_empty() => err.error.message,
        _ => body,
    };

    Err(Error::Api {
        status: status.as_u16(),
        message,
    })
}
