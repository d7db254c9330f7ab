//! # API Module
//!
//! HTTP handlers served by Sporlist.
//!
//! ## Endpoints
//!
//! - [`create_playlist`] - `POST /create-playlist`, always creates a new playlist
//! - [`create_or_update_playlist`] - `POST /create-or-update-playlist`, reuses a
//!   playlist with the same name (case-insensitive) when there is one
//! - [`health`] - `GET /health`, status and version
//! - [`callback`] - OAuth redirect target, only mounted while `sporlist auth` runs
//!
//! Playlist handlers answer with `{message, playlist_url}` on success. Errors
//! are rendered by [`crate::error::Error`] as `{detail}` with status 404 when
//! no song could be resolved and 500 otherwise.

mod callback;
mod health;
mod playlists;

pub use callback::callback;
pub use health::health;
pub use playlists::CREATED_MESSAGE;
pub use playlists::NEW_PLAYLIST_MESSAGE;
pub use playlists::UPDATED_MESSAGE;
pub use playlists::create_or_update_playlist;
pub use playlists::create_playlist;
