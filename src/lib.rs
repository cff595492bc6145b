//! spotex library
//!
//! Exports the playlists of a Spotify user: OAuth2 authorization-code flow
//! with silent token refresh, a playlist → tracks fetch pipeline that
//! flattens every track into a [`types::TrackRecord`], and a JSON/CSV export.
//!
//! # Modules
//!
//! - `api` - HTTP handlers of the local web flow
//! - `cli` - Command-line subcommands
//! - `config` - Configuration from environment variables and `.env` files
//! - `error` - Error taxonomy and HTTP error responses
//! - `management` - Token, session and export management
//! - `server` - Router and listener for the web flow
//! - `spotify` - Spotify accounts service and Web API calls
//! - `transport` - HTTP collaborator trait and its reqwest implementation
//! - `types` - Data structures and API payloads
//! - `utils` - Small helpers
//!
//! # Example
//!
//! ```
//! use spotex::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> spotex::Res<()> {
//!     config::load_env().await?;
//!     cli::serve(config::Config::from_env()?).await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod transport;
pub mod types;
pub mod utils;

/// Result alias for the CLI and other top-level code paths.
///
/// Library operations return the typed errors of the `error` module; this
/// boxed form is where they meet.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational line prefixed with a blue `o`.
///
/// ```
/// info!("Fetched {} playlists", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a line prefixed with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a line prefixed with a red `!` and exits with status 1.
///
/// Only for fatal CLI paths; library code returns errors instead.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a line prefixed with a yellow `!` to stderr.
///
/// ```
/// warning!("Skipping playlist {}: {}", id, reason);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
