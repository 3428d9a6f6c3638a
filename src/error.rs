use std::path::PathBuf;

/// Errors surfaced by the handler and its sinks.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The dated log file could not be created or opened for appending.
    #[error("failed to open log file {}: {source}", .path.display())]
    OpenLogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A field value has no JSON representation.
    #[error("failed to serialize log record: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Writing rendered bytes to a sink's stream failed.
    #[error("failed to write to {sink} sink: {source}")]
    Write {
        sink: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to install global subscriber: {0}")]
    SetGlobalDefault(#[from] tracing::subscriber::SetGlobalDefaultError),
}

pub type Result<T> = std::result::Result<T, Error>;
