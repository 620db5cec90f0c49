//! Hash ring data structure.
//!
//! `HashRing` wraps a [`PositionTable`] in a single `parking_lot::RwLock`.
//! Mutations hold the write lock for their whole critical section, so lookups
//! never see a partially added or removed node. Keys are validated and hashed
//! before the lock is taken.

use metrics::{counter, gauge};
use parking_lot::RwLock;
use tracing::{debug, error, trace, warn};

use super::table::{check_replication, distinct_owners, PositionTable};
use crate::config::RingConfig;
use crate::error::{Error, Result};
use crate::node::NodeKey;
use crate::token::Token;
use crate::topology::Topology;
use crate::vnode;

/// Thread-safe consistent hash ring.
///
/// Share it behind an `Arc`; every method takes `&self`.
///
/// ```rust
/// use corelib::HashRing;
///
/// let ring = HashRing::with_vnodes(64).unwrap();
/// assert!(ring.add_node("cache-a").unwrap());
/// assert!(ring.add_node("cache-b").unwrap());
///
/// let owner = ring.find_node_for("user:42").unwrap();
/// assert!(owner == "cache-a" || owner == "cache-b");
/// ```
pub struct HashRing {
    vnodes: u32,
    table: RwLock<PositionTable>,
}

impl HashRing {
    /// Virtual-node count used by [`HashRing::new`].
    pub const DEFAULT_VNODES: u32 = 1;

    /// Creates an empty ring with one position per node.
    pub fn new() -> Self {
        Self {
            vnodes: Self::DEFAULT_VNODES,
            table: RwLock::new(PositionTable::default()),
        }
    }

    /// Creates an empty ring with `vnodes` positions per node.
    ///
    /// Fails with [`Error::InvalidArgument`] when `vnodes` is zero.
    pub fn with_vnodes(vnodes: u32) -> Result<Self> {
        if vnodes == 0 {
            return Err(Error::InvalidArgument(
                "virtual node count must be at least 1".into(),
            ));
        }
        Ok(Self {
            vnodes,
            table: RwLock::new(PositionTable::default()),
        })
    }

    /// Builds a ring from configuration and adds its nodes.
    pub fn from_config(config: &RingConfig) -> Result<Self> {
        let ring = Self::with_vnodes(config.virtual_nodes)?;
        for node in &config.nodes {
            ring.add_node(node)?;
        }
        Ok(ring)
    }

    /// Virtual nodes per node, fixed at construction.
    pub fn virtual_nodes(&self) -> u32 {
        self.vnodes
    }

    /// Adds a node to the ring.
    ///
    /// Returns `Ok(false)` without touching the ring when the node is already
    /// registered. If any of the node's positions is already occupied the
    /// whole add is rejected with [`Error::PositionCollision`].
    pub fn add_node(&self, key: &str) -> Result<bool> {
        let node = NodeKey::new(key)?;
        let tokens: Vec<Token> = vnode::placements(&node, self.vnodes)
            .into_iter()
            .map(|v| v.token)
            .collect();

        let mut table = self.table.write();
        match table.insert(node.clone(), &tokens) {
            Ok(true) => {
                counter!("hashring_nodes_added_total").increment(1);
                gauge!("hashring_positions").set(table.position_count() as f64);
                debug!(node = %node, positions = tokens.len(), "added node to ring");
                Ok(true)
            }
            Ok(false) => {
                debug!(node = %node, "node already on ring");
                Ok(false)
            }
            Err(err) => {
                if let Error::PositionCollision { position, owner, .. } = &err {
                    counter!("hashring_collisions_total").increment(1);
                    warn!(node = %node, %position, %owner, "position collision, node not added");
                }
                Err(err)
            }
        }
    }

    /// Removes a node and all of its positions.
    ///
    /// Returns `Ok(false)` for a node that is not on the ring.
    pub fn remove_node(&self, key: &str) -> Result<bool> {
        let node = NodeKey::new(key)?;

        let mut table = self.table.write();
        match table.remove(node.as_str()) {
            Ok(true) => {
                counter!("hashring_nodes_removed_total").increment(1);
                gauge!("hashring_positions").set(table.position_count() as f64);
                debug!(node = %node, "removed node from ring");
                Ok(true)
            }
            Ok(false) => Ok(false),
            Err(err) => {
                error!(node = %node, error = %err, "ring index is inconsistent");
                Err(err)
            }
        }
    }

    /// Finds the node responsible for `key`.
    ///
    /// The owner is the node at the first position at or after the key's
    /// token, wrapping to the smallest position past the end of the ring.
    pub fn find_node_for(&self, key: &str) -> Result<NodeKey> {
        let token = Token::from_key(key)?;

        let table = self.table.read();
        let (position, owner) = table.successor(token).ok_or_else(|| {
            Error::FailedPrecondition("ring has no positions; add a node first".into())
        })?;
        counter!("hashring_lookups_total").increment(1);
        trace!(%token, %position, node = %owner, "resolved key");
        Ok(owner.clone())
    }

    /// Finds up to `replication_factor` distinct nodes for `key`.
    ///
    /// Walks clockwise from the position [`find_node_for`](Self::find_node_for)
    /// picks, so the first entry is always the primary owner. A walk that
    /// covers the whole ring before finding enough nodes returns the shorter
    /// list; callers that need the full count must check the length.
    pub fn find_nodes_for(&self, key: &str, replication_factor: usize) -> Result<Vec<NodeKey>> {
        let token = Token::from_key(key)?;

        let table = self.table.read();
        check_replication(replication_factor, table.node_count())?;
        let owners = distinct_owners(table.walk(token), replication_factor);
        counter!("hashring_lookups_total").increment(1);
        trace!(%token, requested = replication_factor, found = owners.len(), "resolved replicas");
        Ok(owners)
    }

    /// Number of nodes on the ring.
    pub fn node_count(&self) -> usize {
        self.table.read().node_count()
    }

    /// Number of positions on the ring (nodes × virtual nodes).
    pub fn position_count(&self) -> usize {
        self.table.read().position_count()
    }

    pub fn is_empty(&self) -> bool {
        self.table.read().is_empty()
    }

    pub fn contains_node(&self, key: &str) -> bool {
        self.table.read().contains_node(key)
    }

    /// All nodes, sorted by key.
    pub fn nodes(&self) -> Vec<NodeKey> {
        let mut nodes: Vec<NodeKey> = self.table.read().nodes().cloned().collect();
        nodes.sort();
        nodes
    }

    /// All positions in ring order (for debugging and inspection).
    pub fn positions(&self) -> Vec<(Token, NodeKey)> {
        self.table
            .read()
            .iter()
            .map(|(token, node)| (*token, node.clone()))
            .collect()
    }

    /// Positions owned by `key`, ascending, or `None` if it is not on the ring.
    pub fn positions_of(&self, key: &str) -> Option<Vec<Token>> {
        self.table.read().positions_of(key).map(<[Token]>::to_vec)
    }

    /// Captures an immutable snapshot of the ring.
    pub fn topology(&self) -> Topology {
        let table = self.table.read();
        let positions = table
            .iter()
            .map(|(token, node)| (*token, node.clone()))
            .collect();
        Topology::new(self.vnodes, positions, table.node_count())
    }
}

impl Default for HashRing {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HashRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let table = self.table.read();
        f.debug_struct("HashRing")
            .field("vnodes", &self.vnodes)
            .field("nodes", &table.node_count())
            .field("positions", &table.position_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_vnodes_rejected() {
        assert!(matches!(
            HashRing::with_vnodes(0),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_add_twice() {
        let ring = HashRing::with_vnodes(8).unwrap();
        assert!(ring.add_node("node1").unwrap());
        assert_eq!(ring.position_count(), 8);
        assert!(!ring.add_node("node1").unwrap());
        assert_eq!(ring.position_count(), 8);
    }

    #[test]
    fn test_find_node_for_picks_successor() {
        let ring = HashRing::new();
        ring.add_node("a").unwrap();
        ring.add_node("b").unwrap();

        let positions = ring.positions();
        let key = "some-key";
        let token = Token::from_key(key).unwrap();
        let expected = positions
            .iter()
            .find(|(p, _)| *p >= token)
            .unwrap_or(&positions[0])
            .1
            .clone();
        assert_eq!(ring.find_node_for(key).unwrap(), expected);
    }

    #[test]
    fn test_positions_of() {
        let ring = HashRing::with_vnodes(4).unwrap();
        ring.add_node("a").unwrap();
        let owned = ring.positions_of("a").unwrap();
        assert_eq!(owned.len(), 4);
        assert!(owned.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(ring.positions_of("missing"), None);
    }

    #[test]
    fn test_debug_output() {
        let ring = HashRing::with_vnodes(2).unwrap();
        ring.add_node("a").unwrap();
        assert_eq!(
            format!("{ring:?}"),
            "HashRing { vnodes: 2, nodes: 1, positions: 2 }"
        );
    }
}
