//! SHA-256 hashing for share codes.

use sha2::{Digest, Sha256};

use crate::data::AccessCodeDigest;
use crate::parse::normalize;

/// Compute the stored digest for a share code.
///
/// The input is normalized first (trimmed, uppercased) so issuance and
/// redemption always hash the same bytes regardless of how the code was typed.
pub fn compute_digest(code: &str) -> AccessCodeDigest {
    let normalized = normalize(code);

    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    let result = hasher.finalize();

    AccessCodeDigest::from_bytes(&result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_hex_sha256() {
        // sha256("ABC")
        let digest = compute_digest("ABC");
        assert_eq!(
            digest.as_str(),
            "b5d4045c3f466fa91fe2cc6abe79232a1a57cdf104f7a26e716e0a1e2789df78"
        );
        assert_eq!(digest.as_str().len(), AccessCodeDigest::HEX_LEN);
    }

    #[test]
    fn test_digest_deterministic() {
        assert_eq!(compute_digest("HJKM2345"), compute_digest("HJKM2345"));
    }

    #[test]
    fn test_digest_ignores_case_and_whitespace() {
        let upper = compute_digest("HJKM2345");
        assert_eq!(compute_digest("hjkm2345"), upper);
        assert_eq!(compute_digest("  HjKm2345\n"), upper);
    }

    #[test]
    fn test_digest_changes_with_code() {
        assert_ne!(compute_digest("HJKM2345"), compute_digest("HJKM2346"));
    }
}
