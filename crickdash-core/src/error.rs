//! Error types for crickdash-core

use thiserror::Error;

/// Main error type for the crickdash-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Connect-time failure: unreachable host, rejected credentials,
    /// unknown database. The driver message is preserved verbatim.
    #[error("connection error: {0}")]
    Connection(String),

    /// An operation that needs a live connection was invoked without one
    #[error("not connected to a database")]
    NotConnected,

    /// Execution-time failure: malformed SQL, missing table or column,
    /// type mismatch. The driver message is preserved verbatim.
    #[error("query error: {0}")]
    Query(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for crickdash-core
pub type Result<T> = std::result::Result<T, Error>;
