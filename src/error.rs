//! Error types for the Backstop library.
//!
//! The rate limiter and cache themselves never fail: absence is a normal
//! `None` and a full window is a normal denied decision. The fallible
//! surface is limited to configuration loading.

use thiserror::Error;

/// Main error type for Backstop operations.
#[derive(Error, Debug)]
pub enum BackstopError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Backstop operations.
pub type Result<T> = std::result::Result<T, BackstopError>;
