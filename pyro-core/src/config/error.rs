//! Configuration error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading configuration documents
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not a valid document
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Document parsed but holds an unusable value
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
