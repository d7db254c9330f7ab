use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

pub const NO_VALID_TRACKS: &str = "No valid tracks found";

#[derive(Debug, Error)]
pub enum Error {
    #[error("No valid tracks found")]
    NoTracksResolved,

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("http status: {status}, {message}")]
    Api { status: u16, message: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("token error: {0}")]
    Token(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Error::NoTracksResolved => (StatusCode::NOT_FOUND, NO_VALID_TRACKS.to_string()),
            other => {
                tracing::error!("request failed: {}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
