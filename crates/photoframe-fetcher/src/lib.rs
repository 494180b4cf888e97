//! `photoframe-fetcher` — the scheduled fetch job.
//!
//! # Overview
//!
//! One pass ([`sync::run_once`]) pulls the tagged-topic list from Discourse,
//! extracts original-size image URLs from each topic's first post, skips
//! everything already downloaded, evicts the oldest stored images to stay
//! under the retention limit, downloads the rest into the image directory
//! and records the pass in SQLite.
//!
//! The scheduling subsystem invokes this as `photoframe run` and never looks
//! inside it.

pub mod client;
pub mod error;
pub mod extract;
pub mod store;
pub mod sync;
pub mod types;

pub use error::{FetcherError, Result};
pub use sync::{run_once, FetchOutcome};
