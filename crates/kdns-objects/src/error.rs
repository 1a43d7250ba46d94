//! Error types for object parsing.

use thiserror::Error;

/// Errors raised while interpreting object fields.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ObjectError {
    /// Protocol name is not a known transport.
    #[error("unknown protocol: {0}")]
    UnknownProtocol(String),

    /// Service type is not recognized.
    #[error("unknown service type: {0}")]
    UnknownServiceType(String),
}

/// Result type for object operations.
pub type Result<T> = std::result::Result<T, ObjectError>;
