//! Error types for query resolution and resolver configuration.

use std::path::PathBuf;

use kdns_index::IndexError;
use thiserror::Error;

/// Errors surfaced by [`Resolver::resolve`](crate::Resolver::resolve).
///
/// A query that matches nothing is not an error; it resolves to an empty
/// answer set.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The cluster state index could not serve a lookup.
    #[error("cluster index lookup failed: {0}")]
    Dependency(#[from] IndexError),

    /// The parser produced a selector the engine cannot act on.
    #[error("malformed selector: {0}")]
    MalformedSelector(String),
}

impl ResolveError {
    /// Returns true if the DNS layer should answer SERVFAIL.
    ///
    /// Dependency failures must not turn into NXDOMAIN, which resolvers
    /// would cache as a negative answer.
    #[must_use]
    pub fn is_server_failure(&self) -> bool {
        match self {
            Self::Dependency(_) | Self::MalformedSelector(_) => true,
        }
    }
}

/// Result type for resolution.
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Errors raised while loading or validating a [`ResolverConfig`](crate::ResolverConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file '{}': {source}", path.display())]
    Io {
        /// Config path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The configuration is not valid JSON for the expected shape.
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds an unusable value.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Unrecognized DNS query type name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown query type: {0}")]
pub struct UnknownQueryType(pub String);
