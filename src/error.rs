//! Error types shared across the crate

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClaimFilerError {
    /// No root directory has been persisted yet
    #[error("no claim root directory is configured")]
    NotConfigured,

    /// The configured root is gone or is not a directory
    #[error("claim root directory does not exist or is not a directory: {}", .0.display())]
    RootMissing(PathBuf),

    #[error("failed to create claim directory {}: {source}", path.display())]
    CreateFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A move was requested before a claim directory was provisioned
    #[error("no claim directory has been created for this claim")]
    NoDestination,

    /// Required form fields are empty or unparseable; holds their labels
    #[error("fill in every field marked with '*' before proceeding: {}", .0.join(", "))]
    IncompleteForm(Vec<String>),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{op} failed for {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ClaimFilerError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        ClaimFilerError::Io {
            op,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClaimFilerError>;
