//! `photoframe-core` — configuration and shared filesystem layout.
//!
//! Everything lives under `~/.photoframe` by default: the TOML config file,
//! the SQLite database, the downloaded images and the fetch log. Other
//! crates go through [`paths`] instead of rebuilding these locations.

pub mod config;
pub mod error;
pub mod paths;

pub use config::PhotoframeConfig;
pub use error::{ConfigError, Result};
