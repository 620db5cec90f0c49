//! Consistent hash ring implementation.
//!
//! The ring manages token positions and provides efficient lookup
//! operations for finding nodes responsible for keys.

mod builder;
mod hash_ring;
pub(crate) mod table;

pub use builder::RingBuilder;
pub use hash_ring::HashRing;

/// Alias for the main ring type (used by lib.rs).
pub type Ring = HashRing;
