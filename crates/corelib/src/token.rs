//! Ring tokens.
//!
//! A token is a point on the 32-bit ring. Tokens are derived from string keys
//! with BLAKE3: the first four bytes of the 256-bit digest, read little-endian.
//! The value is stable across processes and platforms, so a key always lands on
//! the same point.

use crate::error::{Error, Result};
use std::fmt;

/// Number of distinct points on the ring (2^32).
pub const RING_SIZE: u64 = 1 << 32;

/// A position on the consistent hash ring.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Token(pub u32);

impl Token {
    /// Smallest token; lookups past the largest position wrap here.
    pub const MIN: Token = Token(0);
    /// Largest token.
    pub const MAX: Token = Token(u32::MAX);

    /// Hashes a key onto the ring.
    ///
    /// Fails with [`Error::InvalidArgument`] for empty or whitespace-only keys,
    /// before any hashing happens.
    pub fn from_key(key: &str) -> Result<Self> {
        validate_key(key)?;
        Ok(Self::from_bytes(key.as_bytes()))
    }

    /// Hashes raw bytes onto the ring. No validation.
    pub fn from_bytes(data: &[u8]) -> Self {
        let digest = blake3::hash(data);
        let mut prefix = [0u8; 4];
        prefix.copy_from_slice(&digest.as_bytes()[..4]);
        Token(u32::from_le_bytes(prefix))
    }

    /// Clockwise distance from `self` to `other`, wrapping past [`Token::MAX`].
    ///
    /// The distance from a token to itself is zero.
    #[inline]
    pub fn distance_to(&self, other: &Self) -> u64 {
        u64::from(other.0.wrapping_sub(self.0))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

/// Rejects empty and whitespace-only keys.
pub fn validate_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(Error::InvalidArgument(format!(
            "key must be non-empty and not whitespace-only, got {key:?}"
        )));
    }
    Ok(())
}
