//! Error types for the cluster state index.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by a cluster state index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The index has not finished its initial sync with the API server.
    #[error("cluster index has not completed its initial sync")]
    NotSynced,

    /// The backing store cannot serve reads.
    #[error("cluster index unavailable: {0}")]
    Unavailable(String),

    /// An object was rejected on insert.
    #[error("invalid {kind} '{name}': {reason}")]
    InvalidObject {
        /// Object kind.
        kind: &'static str,
        /// Offending name.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A snapshot file could not be read.
    #[error("failed to read snapshot '{}': {source}", path.display())]
    Io {
        /// Snapshot path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// A snapshot could not be decoded.
    #[error("invalid snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Result type for index operations.
pub type Result<T> = std::result::Result<T, IndexError>;
