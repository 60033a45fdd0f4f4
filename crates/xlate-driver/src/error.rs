//! Error types for xlate-driver.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;
use xlate_config::ConfigError;

/// Result type for driver operations.
pub type Result<T> = std::result::Result<T, DriverError>;

#[derive(Error, Diagnostic, Debug)]
pub enum DriverError {
    /// Failed to read a unit or write an artifact.
    #[error("I/O error on {path}")]
    #[diagnostic(code(xlate::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A unit file is not a serialized `SourceUnit`.
    #[error("{path} is not a valid unit document")]
    #[diagnostic(code(xlate::unit_format), help("units are the JSON documents written by the front end"))]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    #[diagnostic(code(xlate::config))]
    Config(#[from] ConfigError),

    /// At least one unit hit a fatal error.
    #[error("{failed} of {total} units failed")]
    #[diagnostic(code(xlate::batch_failed))]
    BatchFailed { failed: usize, total: usize },
}

impl DriverError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DriverError::Io {
            path: path.into(),
            source,
        }
    }
}
