//! Common error types for the yoga tracker

use thiserror::Error;

/// Common result type for yoga tracker operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the library and the search service
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A notification channel refused or failed a delivery
    #[error("Delivery failed: {0}")]
    Delivery(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
