//! Share code generation.

use std::fmt;
use std::sync::LazyLock;

use data_encoding::{Encoding, Specification};
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::{ALPHABET, ShareCodeConfig};
use crate::data::AccessCodeDigest;
use crate::hash::compute_digest;

/// Base32 encoding over the share code alphabet. Every output symbol maps
/// exactly 5 input bits, so random bytes give uniformly random symbols.
static CODE_ENCODING: LazyLock<Encoding> = LazyLock::new(|| {
    let mut spec = Specification::new();
    spec.symbols.push_str(ALPHABET);
    spec.encoding().expect("share code alphabet is a valid base32 alphabet")
});

/// A freshly generated share code.
///
/// Only shown to the issuing user once. The plaintext is wiped from memory
/// when the value is dropped and is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct AccessCode {
    code: String,
}

impl AccessCode {
    /// Get the plaintext code.
    pub fn as_str(&self) -> &str {
        &self.code
    }

    /// Compute the digest to persist for this code.
    pub fn digest(&self) -> AccessCodeDigest {
        compute_digest(&self.code)
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
}

impl fmt::Debug for AccessCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessCode")
            .field("code", &"<redacted>")
            .finish()
    }
}

/// Generate a new share code.
pub fn generate(config: &ShareCodeConfig) -> AccessCode {
    let (code, _) = generate_with_digest(config);
    code
}

/// Generate a new share code and return it with the digest to store.
pub fn generate_with_digest(config: &ShareCodeConfig) -> (AccessCode, AccessCodeDigest) {
    // 5 bits per symbol, rounded up to whole bytes
    let byte_len = (config.length * 5).div_ceil(8);

    // Generate cryptographically secure random data
    let mut random = vec![0u8; byte_len];
    rand::rngs::OsRng.fill_bytes(&mut random);

    let mut encoded = CODE_ENCODING.encode(&random);
    random.zeroize();

    // Trailing symbols past `length` would carry padding bits
    encoded.truncate(config.length);

    let code = AccessCode { code: encoded };
    let digest = code.digest();

    (code, digest)
}
