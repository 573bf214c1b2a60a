//! Error types for Gantry CI.
//!
//! Configuration problems are never errors here; they are reported as
//! validation findings. These variants cover failures to obtain a document
//! in the first place.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Invalid project document: {0}")]
    InvalidProject(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::InvalidProject(err.to_string())
    }
}
