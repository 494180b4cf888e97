use thiserror::Error;

/// Errors that can occur during a fetch pass.
#[derive(Debug, Error)]
pub enum FetcherError {
    /// Discourse API request failed or returned an error status.
    #[error("Discourse API error: {0}")]
    Api(#[from] reqwest::Error),

    /// Underlying SQLite / rusqlite error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Filesystem error in the image directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FetcherError>;
