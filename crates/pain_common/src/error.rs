//! Error types for PAIN.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PainError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Profile {0} already exists")]
    ProfileExists(String),

    #[error("Profile {0} not found")]
    ProfileNotFound(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl PainError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PainError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        PainError::Json {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PainError>;
