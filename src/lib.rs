//! Song list to Spotify playlist service
//!
//! This library turns a playlist name and a list of free-text song queries into
//! a populated Spotify playlist. Every query is resolved to a track through the
//! search API and the resolved tracks are added to a new or an existing playlist.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the playlist endpoints and the OAuth callback
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration loaded from environment variables
//! - `error` - Error type shared by all operations and its HTTP mapping
//! - `management` - Token cache handling and playlist create/update logic
//! - `server` - Router construction and the HTTP server loop
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;

/// A convenient Result type alias for operations that may fail.
///
/// All fallible operations in the crate return [`error::Error`], which maps
/// onto an HTTP response when it reaches a request handler.
pub type Res<T> = std::result::Result<T, error::Error>;

/// Prints a status line prefixed with a blue `o`.
///
/// Used by the CLI commands for progress output. The HTTP service logs through
/// `tracing` instead.
///
/// ```
/// info!("Listening on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a status line prefixed with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a message prefixed with a red `!` and exits with status 1.
///
/// Only for failures the CLI cannot recover from, e.g. the server address
/// cannot be bound. Code after the macro call does not run.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a message prefixed with a yellow `!`.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
