//! # CLI Module
//!
//! Entry points for the `sporlist` subcommands.
//!
//! - [`serve`] - runs the HTTP service
//! - [`auth`] - authorizes the service against a Spotify account and fills
//!   the token cache the service reads on every request
//!
//! ## Usage
//!
//! ```bash
//! sporlist auth     # once, opens the browser
//! sporlist serve    # then keep the service running
//! ```

mod auth;
mod serve;

pub use auth::auth;
pub use serve::serve;
