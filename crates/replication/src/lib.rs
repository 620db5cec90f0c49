//! Replication strategies for consistent hashing.
//!
//! This crate provides pluggable replication strategies that determine:
//! - How many replicas to create
//! - Which nodes hold them, in ring-walk order starting at the primary
//! - Whether a short (degraded) placement is acceptable

pub mod error;
pub mod placement;
pub mod strategy;

pub use error::ReplicationError;
pub use placement::ReplicaPlacement;
pub use strategy::{ReplicationStrategy, SimpleStrategy};
