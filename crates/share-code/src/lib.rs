//! Human-typable share codes with one-way storage digests.
//!
//! This crate provides functionality for:
//! - Generating short random codes from an alphabet without ambiguous glyphs
//! - Normalizing user-entered codes so redemption is case-insensitive
//! - Deriving the SHA-256 digest that is stored in place of the code
//! - Checking an entered code against a stored digest in constant time
//!
//! # Code Format
//!
//! Codes are `length` symbols (8 by default) from
//! `ABCDEFGHJKLMNPQRSTUVWXYZ23456789`, e.g. `K7QXM2RD`. With 32 symbols every
//! character carries 5 bits, so the default code has 40 bits of entropy.
//!
//! # Security Features
//!
//! - Codes are drawn from the operating system CSPRNG
//! - Only the digest is meant to be persisted
//! - Plaintext codes are zeroized on drop and redacted from `Debug`
//! - Constant-time digest comparison
//!
//! # Example
//!
//! ```rust
//! use share_code::{ShareCodeConfig, generate_with_digest, verify};
//!
//! let config = ShareCodeConfig::default();
//! let (code, digest) = generate_with_digest(&config);
//!
//! // Show code.as_str() to the user once, store only the digest.
//! let entered = code.as_str().to_lowercase();
//! assert!(verify(&entered, &digest).unwrap());
//! ```

mod code;
mod config;
mod data;
mod error;
mod hash;
mod parse;
mod verify;

// Public re-exports
pub use code::{AccessCode, generate, generate_with_digest};
pub use config::{ALPHABET, DEFAULT_LENGTH, MAX_LENGTH, MIN_LENGTH, ShareCodeConfig};
pub use data::AccessCodeDigest;
pub use error::{Result, ShareCodeError};
pub use hash::compute_digest;
pub use parse::{ParsedCode, normalize, parse};
pub use verify::{digests_equal, verify, verify_parsed};
