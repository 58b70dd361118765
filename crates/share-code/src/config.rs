//! Configuration for share code generation.

use crate::error::{Result, ShareCodeError};

/// Symbols a share code is drawn from. Visually ambiguous glyphs
/// (`0`, `O`, `1`, `I`) are left out so codes survive being read aloud or
/// copied by hand.
pub const ALPHABET: &str = "ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Default number of characters in a generated code.
pub const DEFAULT_LENGTH: usize = 8;

/// Shortest code length accepted by [`ShareCodeConfig::new`].
pub const MIN_LENGTH: usize = 4;

/// Longest code length accepted by [`ShareCodeConfig::new`].
pub const MAX_LENGTH: usize = 32;

/// Configuration for share code generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShareCodeConfig {
    /// Number of alphabet symbols per code. Each symbol carries 5 bits.
    pub length: usize,
}

impl Default for ShareCodeConfig {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
        }
    }
}

impl ShareCodeConfig {
    /// Create a config producing codes of `length` characters.
    pub fn new(length: usize) -> Result<Self> {
        let config = Self { length };
        config.validate()?;
        Ok(config)
    }

    /// Check that the length is within `MIN_LENGTH..=MAX_LENGTH`.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&self.length) {
            return Err(ShareCodeError::InvalidLength {
                length: self.length,
                min: MIN_LENGTH,
                max: MAX_LENGTH,
            });
        }
        Ok(())
    }

    /// Entropy of a generated code in bits.
    pub fn entropy_bits(&self) -> usize {
        self.length * 5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ShareCodeConfig::default();
        assert_eq!(config.length, 8);
        assert_eq!(config.entropy_bits(), 40);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_alphabet_has_32_unambiguous_symbols() {
        assert_eq!(ALPHABET.len(), 32);
        for ambiguous in ['0', 'O', '1', 'I'] {
            assert!(!ALPHABET.contains(ambiguous));
        }
    }

    #[test]
    fn test_length_bounds() {
        assert!(ShareCodeConfig::new(MIN_LENGTH).is_ok());
        assert!(ShareCodeConfig::new(MAX_LENGTH).is_ok());
        assert_eq!(
            ShareCodeConfig::new(3),
            Err(ShareCodeError::InvalidLength {
                length: 3,
                min: MIN_LENGTH,
                max: MAX_LENGTH
            })
        );
        assert!(ShareCodeConfig::new(33).is_err());
    }
}
