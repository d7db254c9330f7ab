#![allow(dead_code)]

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex},
};

use axum::{
    Form, Json, Router,
    extract::{Path as UrlPath, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use sporlist::{config::Config, types::Token};
use tempfile::TempDir;

pub const VALID_TOKEN: &str = "valid-token";
pub const REFRESHED_TOKEN: &str = "refreshed-token";
pub const USER_ID: &str = "test-user";

#[derive(Debug, Clone)]
pub struct FakePlaylist {
    pub id: String,
    pub name: String,
    pub public: bool,
    pub tracks: Vec<String>,
}

#[derive(Debug, Default)]
pub struct FakeState {
    /// (title, uri); a query matches when it contains the title, ignoring case.
    pub catalog: Vec<(String, String)>,
    pub playlists: Vec<FakePlaylist>,
    /// "METHOD /path?query" for every Web API call.
    pub requests: Vec<String>,
    pub token_requests: Vec<HashMap<String, String>>,
    /// Authorization header of every token request.
    pub token_auth_headers: Vec<String>,
    pub fail_add_tracks: bool,
    pub access_token: String,
}

pub type Shared = Arc<Mutex<FakeState>>;

/// In-process stand-in for the Web API and the accounts service.
pub struct FakeSpotify {
    pub state: Shared,
    pub base_url: String,
}

impl FakeSpotify {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(FakeState {
            access_token: VALID_TOKEN.to_string(),
            ..Default::default()
        }));

        let api = Router::new()
            .route("/me", get(me))
            .route("/search", get(search))
            .route("/me/playlists", get(my_playlists))
            .route("/users/{user_id}/playlists", post(create_playlist))
            .route("/playlists/{playlist_id}/tracks", post(add_tracks));

        let app = Router::new()
            .nest("/v1", api)
            .route("/api/token", post(token_endpoint))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            state,
            base_url: format!("http://{addr}"),
        }
    }

    pub fn config(&self, cache_path: &Path) -> Config {
        Config {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            redirect_uri: "http://127.0.0.1:8888/callback".to_string(),
            scope: sporlist::config::SCOPE.to_string(),
            cache_path: cache_path.to_path_buf(),
            api_url: format!("{}/v1", self.base_url),
            accounts_url: self.base_url.clone(),
            server_addr: "127.0.0.1:0".to_string(),
        }
    }

    pub fn add_track(&self, title: &str, uri: &str) {
        self.state
            .lock()
            .unwrap()
            .catalog
            .push((title.to_string(), uri.to_string()));
    }

    pub fn add_playlist(&self, name: &str) -> String {
        let mut state = self.state.lock().unwrap();
        let id = format!("existing{}", state.playlists.len());
        state.playlists.push(FakePlaylist {
            id: id.clone(),
            name: name.to_string(),
            public: true,
            tracks: Vec::new(),
        });
        id
    }

    pub fn playlists(&self) -> Vec<FakePlaylist> {
        self.state.lock().unwrap().playlists.clone()
    }

    pub fn playlist(&self, id: &str) -> Option<FakePlaylist> {
        self.playlists().into_iter().find(|p| p.id == id)
    }

    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn fail_add_tracks(&self) {
        self.state.lock().unwrap().fail_add_tracks = true;
    }
}

/// A temp dir holding a token cache; keep it alive for the whole test.
pub struct TokenCache {
    pub dir: TempDir,
}

impl TokenCache {
    pub fn path(&self) -> std::path::PathBuf {
        self.dir.path().join(".cache-spotify")
    }
}

pub fn write_token_cache(token: &Token) -> TokenCache {
    let cache = TokenCache {
        dir: TempDir::new().unwrap(),
    };
    std::fs::write(cache.path(), serde_json::to_string(token).unwrap()).unwrap();
    cache
}

pub fn token(access_token: &str, expires_at: u64, refresh_token: Option<&str>) -> Token {
    Token {
        access_token: access_token.to_string(),
        token_type: "Bearer".to_string(),
        expires_in: 3600,
        scope: sporlist::config::SCOPE.to_string(),
        expires_at,
        refresh_token: refresh_token.map(str::to_string),
    }
}

pub fn now() -> u64 {
    chrono::Utc::now().timestamp() as u64
}

pub fn valid_token_cache() -> TokenCache {
    write_token_cache(&token(VALID_TOKEN, now() + 3600, Some("refresh-me")))
}

fn api_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({ "error": { "status": status.as_u16(), "message": message } })),
    )
        .into_response()
}

fn authorize(state: &Shared, headers: &HeaderMap, request: String) -> Result<(), Response> {
    let mut state = state.lock().unwrap();
    state.requests.push(request);

    let expected = format!("Bearer {}", state.access_token);
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(api_error(StatusCode::UNAUTHORIZED, "Invalid access token")),
    }
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(resp) = authorize(&state, &headers, "GET /me".to_string()) {
        return resp;
    }
    Json(json!({ "id": USER_ID, "display_name": "Test User" })).into_response()
}

async fn search(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let q = params.get("q").cloned().unwrap_or_default();
    if let Err(resp) = authorize(&state, &headers, format!("GET /search?q={q}")) {
        return resp;
    }
    if params.get("type").map(String::as_str) != Some("track")
        || params.get("limit").map(String::as_str) != Some("1")
    {
        return api_error(StatusCode::BAD_REQUEST, "unexpected search parameters");
    }

    let state = state.lock().unwrap();
    let query = q.to_lowercase();
    let items: Vec<Value> = state
        .catalog
        .iter()
        .find(|(title, _)| !query.is_empty() && query.contains(&title.to_lowercase()))
        .map(|(title, uri)| {
            json!({ "id": uri.rsplit(':').next(), "name": title, "uri": uri })
        })
        .into_iter()
        .collect();

    Json(json!({ "tracks": { "items": items, "next": null, "total": items.len() } }))
        .into_response()
}

async fn my_playlists(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let limit: usize = params.get("limit").and_then(|v| v.parse().ok()).unwrap_or(20);
    let offset: usize = params.get("offset").and_then(|v| v.parse().ok()).unwrap_or(0);
    if let Err(resp) = authorize(
        &state,
        &headers,
        format!("GET /me/playlists?limit={limit}&offset={offset}"),
    ) {
        return resp;
    }

    let state = state.lock().unwrap();
    let total = state.playlists.len();
    let items: Vec<Value> = state
        .playlists
        .iter()
        .skip(offset)
        .take(limit)
        .map(|p| {
            json!({
                "id": p.id,
                "name": p.name,
                "external_urls": {
                    "spotify": format!("https://open.spotify.com/playlist/{}", p.id)
                },
            })
        })
        .collect();
    let next = (offset + limit < total).then(|| {
        format!(
            "https://api.spotify.com/v1/me/playlists?offset={}&limit={limit}",
            offset + limit
        )
    });

    Json(json!({
        "items": items,
        "next": next,
        "total": total,
        "limit": limit,
        "offset": offset,
    }))
    .into_response()
}

async fn create_playlist(
    State(state): State<Shared>,
    headers: HeaderMap,
    UrlPath(user_id): UrlPath<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(resp) = authorize(&state, &headers, format!("POST /users/{user_id}/playlists")) {
        return resp;
    }
    if user_id != USER_ID {
        return api_error(StatusCode::FORBIDDEN, "You cannot create a playlist for another user");
    }

    let mut state = state.lock().unwrap();
    let id = format!("created{}", state.playlists.len());
    let name = body["name"].as_str().unwrap_or_default().to_string();
    let public = body["public"].as_bool().unwrap_or(false);
    state.playlists.push(FakePlaylist {
        id: id.clone(),
        name: name.clone(),
        public,
        tracks: Vec::new(),
    });

    (
        StatusCode::CREATED,
        Json(json!({
            "id": id,
            "name": name,
            "public": public,
            "external_urls": { "spotify": format!("https://open.spotify.com/playlist/{id}") },
        })),
    )
        .into_response()
}

async fn add_tracks(
    State(state): State<Shared>,
    headers: HeaderMap,
    UrlPath(playlist_id): UrlPath<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(resp) = authorize(&state, &headers, format!("POST /playlists/{playlist_id}/tracks"))
    {
        return resp;
    }

    let mut state = state.lock().unwrap();
    if state.fail_add_tracks {
        return api_error(StatusCode::INTERNAL_SERVER_ERROR, "Server error");
    }

    let uris: Vec<String> = body["uris"]
        .as_array()
        .map(|uris| {
            uris.iter()
                .filter_map(|u| u.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();
    if uris.len() > 100 {
        return api_error(StatusCode::BAD_REQUEST, "Too many ids requested");
    }

    let Some(playlist) = state.playlists.iter_mut().find(|p| p.id == playlist_id) else {
        return api_error(StatusCode::NOT_FOUND, "Resource not found");
    };
    playlist.tracks.extend(uris);
    let snapshot = format!("snapshot-{}", playlist.tracks.len());

    (StatusCode::CREATED, Json(json!({ "snapshot_id": snapshot }))).into_response()
}

async fn token_endpoint(
    State(state): State<Shared>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.token_requests.push(form.clone());
    let auth_header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    state.token_auth_headers.push(auth_header);

    match form.get("grant_type").map(String::as_str) {
        Some("refresh_token") if form.get("refresh_token").is_some_and(|t| !t.is_empty()) => {
            state.access_token = REFRESHED_TOKEN.to_string();
            Json(json!({
                "access_token": REFRESHED_TOKEN,
                "token_type": "Bearer",
                "expires_in": 3600,
                "scope": sporlist::config::SCOPE,
            }))
            .into_response()
        }
        Some("authorization_code") => Json(json!({
            "access_token": "exchanged-token",
            "token_type": "Bearer",
            "expires_in": 3600,
            "scope": sporlist::config::SCOPE,
            "refresh_token": "exchanged-refresh",
        }))
        .into_response(),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_grant", "error_description": "Invalid refresh token" })),
        )
            .into_response(),
    }
}
