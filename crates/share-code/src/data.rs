//! Data types for share code storage.

use std::fmt;

use crate::error::{Result, ShareCodeError};

/// Hex-encoded SHA-256 digest of a normalized share code.
///
/// This is the only form of a code that is ever persisted. The plaintext
/// cannot be recovered from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccessCodeDigest(String);

impl AccessCodeDigest {
    /// Length of the hex encoding (SHA-256, 32 bytes).
    pub const HEX_LEN: usize = 64;

    /// Wrap a digest loaded from storage, checking its encoding.
    pub fn from_hex(hex_digest: impl Into<String>) -> Result<Self> {
        let hex_digest = hex_digest.into().to_ascii_lowercase();
        if hex_digest.len() != Self::HEX_LEN || hex::decode(&hex_digest).is_err() {
            return Err(ShareCodeError::InvalidDigest);
        }
        Ok(Self(hex_digest))
    }

    pub(crate) fn from_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Get the digest as a lowercase hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the digest back to raw bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        // Encoding is checked on construction.
        if let Ok(decoded) = hex::decode(&self.0) {
            bytes.copy_from_slice(&decoded);
        }
        bytes
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for AccessCodeDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AccessCodeDigest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
