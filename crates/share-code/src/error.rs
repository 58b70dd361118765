//! Error types for share code operations.

use thiserror::Error;

/// Errors that can occur while generating, parsing, or checking share codes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShareCodeError {
    /// The entered code was empty after trimming whitespace.
    #[error("Share code is empty")]
    EmptyCode,

    /// Configured code length is outside the supported range.
    #[error("Invalid code length {length}: must be between {min} and {max}")]
    InvalidLength {
        length: usize,
        min: usize,
        max: usize,
    },

    /// Stored digest is not a 64 character hex string.
    #[error("Invalid digest encoding")]
    InvalidDigest,
}

/// Result type alias for share code operations.
pub type Result<T> = std::result::Result<T, ShareCodeError>;
