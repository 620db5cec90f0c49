//! Simple replication strategy.
//!
//! Places N replicas sequentially around the ring (clockwise from the primary).
//! This is the simplest replication strategy and works well for:
//!
//! - Small clusters (< 10 nodes)
//! - Single data center deployments
//! - When network topology doesn't matter
//!
//! # Algorithm
//!
//! 1. Find primary node (clockwise search from key's token)
//! 2. Continue clockwise to find N-1 more unique nodes
//! 3. Return list of node keys (primary first)
//!
//! # Performance
//!
//! - **Time**: O(log n + p) where n = positions and p = positions walked
//! - **Space**: O(r) - returns Vec of node keys
//!
//! # Limitations
//!
//! - Doesn't consider data center/rack placement
//! - May place replicas on nodes in the same failure domain

use crate::error::ReplicationError;
use crate::placement::ReplicaPlacement;
use crate::strategy::ReplicationStrategy;
use corelib::HashRing;
use tracing::warn;

/// Simple replication strategy: N replicas placed sequentially around the ring.
///
/// # Example
///
/// ```rust
/// use corelib::HashRing;
/// use replication::{ReplicationStrategy, SimpleStrategy};
///
/// let ring = HashRing::with_vnodes(16).unwrap();
/// for node in ["node1", "node2", "node3"] {
///     ring.add_node(node).unwrap();
/// }
///
/// let strategy = SimpleStrategy::new(3);
/// let placement = strategy.replicas_for_key(&ring, "my-key").unwrap();
/// assert_eq!(placement.replicas().len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct SimpleStrategy {
    /// Number of replicas to create (including primary).
    replication_factor: usize,
}

impl SimpleStrategy {
    /// Create a new simple strategy with the given replication factor.
    ///
    /// * `replication_factor` - Number of replicas (typically 1-5)
    ///   - 1: No replication (single copy)
    ///   - 3: Standard (primary + 2 replicas)
    ///   - 5: High availability (primary + 4 replicas)
    pub fn new(replication_factor: usize) -> Self {
        Self { replication_factor }
    }
}

impl Default for SimpleStrategy {
    /// Three replicas.
    fn default() -> Self {
        Self::new(3)
    }
}

impl ReplicationStrategy for SimpleStrategy {
    fn replication_factor(&self) -> usize {
        self.replication_factor
    }

    fn replicas_for_key(
        &self,
        ring: &HashRing,
        key: &str,
    ) -> Result<ReplicaPlacement, ReplicationError> {
        let replicas = ring.find_nodes_for(key, self.replication_factor)?;
        let placement = ReplicaPlacement::new(self.replication_factor, replicas);
        if placement.is_degraded() {
            warn!(
                key,
                requested = self.replication_factor,
                found = placement.replicas().len(),
                "ring walk ended before enough replicas were found"
            );
        }
        Ok(placement)
    }

    fn name(&self) -> &'static str {
        "SimpleStrategy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::Error;

    fn ring() -> HashRing {
        let ring = HashRing::with_vnodes(4).unwrap();
        ring.add_node("node1").unwrap();
        ring.add_node("node2").unwrap();
        ring.add_node("node3").unwrap();
        ring
    }

    #[test]
    fn test_simple_strategy_replication_factor() {
        let strategy = SimpleStrategy::new(3);
        assert_eq!(strategy.replication_factor(), 3);
        assert_eq!(SimpleStrategy::default().replication_factor(), 3);
        assert_eq!(strategy.name(), "SimpleStrategy");
    }

    #[test]
    fn test_simple_strategy_replicas() {
        let ring = ring();
        let strategy = SimpleStrategy::new(3);
        let placement = strategy.replicas_for_key(&ring, "test-key").unwrap();

        assert_eq!(placement.replicas().len(), 3);
        let unique: std::collections::HashSet<_> = placement.replicas().iter().collect();
        assert_eq!(unique.len(), 3);
        assert_eq!(
            placement.primary(),
            Some(&ring.find_node_for("test-key").unwrap())
        );
    }

    #[test]
    fn test_zero_replicas() {
        let placement = SimpleStrategy::new(0)
            .replicas_for_key(&ring(), "test-key")
            .unwrap();
        assert!(placement.replicas().is_empty());
    }

    #[test]
    fn test_too_many_replicas() {
        let err = SimpleStrategy::new(4)
            .replicas_for_key(&ring(), "test-key")
            .unwrap_err();
        assert_eq!(
            err,
            ReplicationError::Ring(Error::OutOfRange {
                requested: 4,
                available: 3
            })
        );
    }

    #[test]
    fn test_strict_accepts_full_placement() {
        let placement = SimpleStrategy::new(2)
            .replicas_for_key_strict(&ring(), "test-key")
            .unwrap();
        assert_eq!(placement.replicas().len(), 2);
    }

    #[test]
    fn test_empty_ring() {
        let err = SimpleStrategy::new(1)
            .replicas_for_key(&HashRing::new(), "test-key")
            .unwrap_err();
        assert!(matches!(
            err,
            ReplicationError::Ring(Error::FailedPrecondition(_))
        ));
    }
}
