use std::path::PathBuf;
use thiserror::Error;

/// Everything that can abort a merge run
#[derive(Error, Debug)]
pub enum MergeError {
    #[error("no files match pattern '{0}'")]
    NoMatchingFiles(String),

    #[error("invalid glob pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("failed to read {path:?}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path:?}")]
    MalformedInput {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to serialize merged document")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {path:?}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, MergeError>;
