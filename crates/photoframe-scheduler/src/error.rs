use thiserror::Error;

/// Errors that can occur within the scheduling subsystem.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The requested interval is not a positive number of minutes.
    #[error("Invalid interval: {0} minutes (must be a positive integer)")]
    InvalidInterval(u32),

    /// A native scheduling tool invocation failed (permissions, missing
    /// binary). The previously installed job, if any, is left intact.
    #[error("{backend} backend error: {message}")]
    Backend {
        backend: &'static str,
        message: String,
    },

    /// Filesystem error while writing or removing a job artifact.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
