//! Replication strategy abstractions.
//!
//! Replication strategies determine how many replicas to create and where
//! to place them on the ring.
//!
//! - **SimpleStrategy**: N replicas placed sequentially around the ring

pub mod simple;

pub use simple::SimpleStrategy;

use crate::error::ReplicationError;
use crate::placement::ReplicaPlacement;
use corelib::HashRing;

/// Trait for replication strategies.
///
/// A replication strategy determines:
/// 1. How many replicas to create for a key
/// 2. Which nodes should hold those replicas
///
/// # Thread Safety
///
/// Implementations must be thread-safe (Send + Sync) as they may be
/// shared across threads.
pub trait ReplicationStrategy: Send + Sync + 'static {
    /// Get the number of replicas this strategy creates.
    fn replication_factor(&self) -> usize;

    /// Find replica nodes for a given key.
    ///
    /// The placement may hold fewer nodes than the replication factor when
    /// the ring walk runs out; see [`ReplicaPlacement::is_degraded`].
    fn replicas_for_key(
        &self,
        ring: &HashRing,
        key: &str,
    ) -> Result<ReplicaPlacement, ReplicationError>;

    /// Like [`replicas_for_key`](Self::replicas_for_key), but a degraded
    /// placement is an error.
    fn replicas_for_key_strict(
        &self,
        ring: &HashRing,
        key: &str,
    ) -> Result<ReplicaPlacement, ReplicationError> {
        let placement = self.replicas_for_key(ring, key)?;
        if placement.is_degraded() {
            return Err(ReplicationError::Underreplicated {
                key: key.to_string(),
                requested: placement.requested(),
                found: placement.replicas().len(),
            });
        }
        Ok(placement)
    }

    /// Get the strategy name (for logging/debugging).
    fn name(&self) -> &'static str;
}
