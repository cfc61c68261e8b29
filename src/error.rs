//! Error taxonomy shared by the store, the trackers and the session loops

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TutorError {
    #[error("Failed to access {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed dictionary at {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Prompt failed: {0}")]
    Prompt(#[source] std::io::Error),

    #[error("Input closed")]
    Interrupted,

    #[error("Dictionary could not be saved during shutdown")]
    ShutdownFailed,
}

impl TutorError {
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TutorError::Storage {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        TutorError::Json {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, TutorError>;
