//! Error types for riffwave

use thiserror::Error;

/// Result type alias for riffwave operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for riffwave
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Format error (malformed or unsupported container data)
    #[error("Format error: {0}")]
    Format(String),

    /// Validation error (invalid header field at construction/serialization)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Codec error (unmet codec precondition)
    #[error("Codec error: {0}")]
    Codec(String),

    /// Value does not fit the configured bit width
    #[error("Value {value} does not fit in {bits} bits")]
    Overflow { value: f64, bits: u8 },

    /// Sample index out of range
    #[error("Sample index {index} out of range ({len} samples)")]
    OutOfRange { index: usize, len: usize },

    /// Unsupported feature
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl Error {
    /// Create a format error
    pub fn format<S: Into<String>>(msg: S) -> Self {
        Error::Format(msg.into())
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Error::Validation(msg.into())
    }

    /// Create a codec error
    pub fn codec<S: Into<String>>(msg: S) -> Self {
        Error::Codec(msg.into())
    }

    /// Create an unsupported error
    pub fn unsupported<S: Into<String>>(msg: S) -> Self {
        Error::Unsupported(msg.into())
    }
}
