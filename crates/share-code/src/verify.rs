//! Code verification with constant-time comparison.

use subtle::ConstantTimeEq;

use crate::data::AccessCodeDigest;
use crate::error::Result;
use crate::parse::{ParsedCode, parse};

/// Verify an entered code against a stored digest.
///
/// # Returns
/// * `Ok(true)` if the code hashes to `stored`
/// * `Ok(false)` if it does not
/// * `Err` if the input is empty
pub fn verify(code: &str, stored: &AccessCodeDigest) -> Result<bool> {
    let parsed = parse(code)?;
    Ok(verify_parsed(&parsed, stored))
}

/// Verify a pre-parsed code against a stored digest.
pub fn verify_parsed(parsed: &ParsedCode, stored: &AccessCodeDigest) -> bool {
    digests_equal(&parsed.digest(), stored)
}

/// Constant-time comparison of two digests.
pub fn digests_equal(a: &AccessCodeDigest, b: &AccessCodeDigest) -> bool {
    a.to_bytes().ct_eq(&b.to_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::generate_with_digest;
    use crate::config::ShareCodeConfig;
    use crate::error::ShareCodeError;

    #[test]
    fn test_verify_valid_code() {
        let (code, digest) = generate_with_digest(&ShareCodeConfig::default());
        assert!(verify(code.as_str(), &digest).unwrap());
    }

    #[test]
    fn test_verify_is_case_insensitive() {
        let (code, digest) = generate_with_digest(&ShareCodeConfig::default());
        let lower = code.as_str().to_lowercase();
        assert!(verify(&lower, &digest).unwrap());
        assert!(verify(&format!("  {lower}  "), &digest).unwrap());
    }

    #[test]
    fn test_verify_wrong_code() {
        let config = ShareCodeConfig::default();
        let (_, digest) = generate_with_digest(&config);
        let (other, _) = generate_with_digest(&config);
        assert!(!verify(other.as_str(), &digest).unwrap());
    }

    #[test]
    fn test_verify_empty_code() {
        let (_, digest) = generate_with_digest(&ShareCodeConfig::default());
        assert_eq!(verify("   ", &digest), Err(ShareCodeError::EmptyCode));
    }
}
