mod auth;
mod playlist;

pub use auth::EXPIRY_MARGIN_SECS;
pub use auth::TokenManager;
pub use playlist::PlaylistManager;
pub use playlist::PlaylistMode;
pub use playlist::resolved_uris;
