//! CLI error types.

use kdns_index::IndexError;
use kdns_resolver::{ConfigError, ResolveError};
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// The resolver configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The cluster snapshot could not be loaded.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] IndexError),

    /// Resolution failed.
    #[error("resolution error: {0}")]
    Resolve(#[from] ResolveError),

    /// The name lies outside every configured zone.
    #[error("no configured zone contains '{0}'")]
    NoZone(String),

    /// Output formatting error.
    #[error("format error: {0}")]
    Format(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
