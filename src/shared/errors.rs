//! Error handling for the application

use std::path::PathBuf;
use thiserror::Error;

/// Snapshot loading errors
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("File not found - {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON format in {}: {source}", path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid {kind} data structure in {}: {reason}", path.display())]
    InvalidShape {
        kind: &'static str,
        path: PathBuf,
        reason: String,
    },
}

/// Result persistence errors
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("Failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// General application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Snapshot error: {0}")]
    Load(#[from] LoadError),

    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),
}
