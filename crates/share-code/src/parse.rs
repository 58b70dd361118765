//! Parsing of user-entered share codes.

use zeroize::Zeroize;

use crate::data::AccessCodeDigest;
use crate::error::{Result, ShareCodeError};
use crate::hash::compute_digest;

/// A share code as entered by a user, normalized for hashing.
#[derive(Debug)]
pub struct ParsedCode {
    normalized: String,
}

impl ParsedCode {
    /// Get the normalized code (trimmed, uppercase).
    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    /// Digest to look the code up by.
    pub fn digest(&self) -> AccessCodeDigest {
        compute_digest(&self.normalized)
    }
}

impl Drop for ParsedCode {
    fn drop(&mut self) {
        // Clear entered code from memory when dropped
        self.normalized.zeroize();
    }
}

/// Normalize a code for hashing: strip surrounding whitespace and uppercase.
pub fn normalize(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Parse user input into a normalized code.
///
/// Only emptiness is rejected here. Codes with characters outside the
/// alphabet are still hashed and looked up; they simply never match.
pub fn parse(input: &str) -> Result<ParsedCode> {
    let normalized = normalize(input);
    if normalized.is_empty() {
        return Err(ShareCodeError::EmptyCode);
    }
    Ok(ParsedCode { normalized })
}
