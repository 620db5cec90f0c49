//! Builder for populating a ring in one expression.

use super::hash_ring::HashRing;
use crate::error::Result;

/// Collects a vnode count and a node list, then builds the ring.
///
/// ```rust
/// use corelib::RingBuilder;
///
/// let ring = RingBuilder::new()
///     .with_vnodes(8)
///     .add_node("node1")
///     .add_node("node2")
///     .build()
///     .unwrap();
/// assert_eq!(ring.position_count(), 16);
/// ```
#[derive(Debug, Clone)]
pub struct RingBuilder {
    vnodes: u32,
    nodes: Vec<String>,
}

impl RingBuilder {
    pub fn new() -> Self {
        Self {
            vnodes: HashRing::DEFAULT_VNODES,
            nodes: Vec::new(),
        }
    }

    /// Positions per node. Zero is rejected by [`RingBuilder::build`].
    pub fn with_vnodes(mut self, vnodes: u32) -> Self {
        self.vnodes = vnodes;
        self
    }

    pub fn add_node(mut self, key: impl Into<String>) -> Self {
        self.nodes.push(key.into());
        self
    }

    pub fn add_nodes<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nodes.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Builds the ring, adding nodes in the order they were given.
    ///
    /// Repeated keys are added once. Invalid keys and position collisions
    /// fail the build.
    pub fn build(self) -> Result<HashRing> {
        let ring = HashRing::with_vnodes(self.vnodes)?;
        for node in &self.nodes {
            ring.add_node(node)?;
        }
        Ok(ring)
    }
}

impl Default for RingBuilder {
    fn default() -> Self {
        Self::new()
    }
}
