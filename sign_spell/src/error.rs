//! Errors that end a session.

use std::path::PathBuf;

use sign_stream::TableError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// The visualizer window could not be created.
    #[error("cannot open window: {0}")]
    Window(String),

    /// The hand source failed or stopped delivering frames.
    #[error("hand acquisition failed: {0}")]
    Acquisition(String),

    #[error("cannot read config {path}: {source}")]
    ConfigIo {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path:   PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    ConfigValue(String),

    #[error("invalid pattern table: {0}")]
    Table(#[from] TableError),
}
