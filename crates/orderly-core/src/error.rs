//! Error types for the orderly-core library.
//!
//! Extraction itself never fails; these errors only come from configuring
//! the engine or from the file-backed configuration layer.

use thiserror::Error;

/// Main error type for the orderly library.
#[derive(Error, Debug)]
pub enum OrderlyError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A configured pattern could not be compiled.
    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// A caller-supplied date could not be understood.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the orderly library.
pub type Result<T> = std::result::Result<T, OrderlyError>;
