//! Virtual node abstractions.
//!
//! # Virtual Nodes (VNodes) Concept
//!
//! Virtual nodes are a technique to improve load distribution in consistent hashing.
//! Instead of each physical node having a single token on the ring, each node has
//! multiple tokens (virtual nodes). This provides:
//!
//! 1. **Better Load Distribution**: More tokens = smoother distribution of keys
//! 2. **Gradual Rebalancing**: When nodes join/leave, only a fraction of keys move
//! 3. **Fault Tolerance**: Failure of one node affects fewer keys (distributed across vnodes)
//!
//! # Placement
//!
//! - A ring built with one vnode per node places each node at `hash(node_key)`.
//! - A ring built with `n > 1` vnodes places node `k` at `hash("k:0")` ..
//!   `hash("k:{n-1}")`.
//!
//! # Performance Characteristics
//!
//! - **Memory**: O(v) where v = number of vnodes per node
//! - **Lookup**: O(log n) where n = total vnodes (not affected by vnode count per node)
//! - **Rebalancing**: O(k/v) keys move when a node joins/leaves (k = total keys, v = vnodes/node)

use crate::node::NodeKey;
use crate::token::Token;

/// A virtual node on the hash ring.
///
/// Represents a single token position owned by a physical node.
///
/// # Memory Layout
///
/// ```text
/// VirtualNode {
///     token: Token(u32),  // 4 bytes
///     index: u32,         // 4 bytes
/// }
/// ```
///
/// # Example
///
/// ```rust
/// use corelib::{NodeKey, VirtualNode};
///
/// let node = NodeKey::new("node1").unwrap();
/// let vnode = VirtualNode::from_index(&node, 0);
/// assert_eq!(vnode.index(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtualNode {
    /// Token position on the ring.
    ///
    /// Keys whose token falls in the arc ending at this position are owned by
    /// the vnode's physical node.
    pub token: Token,

    /// Index of this vnode within its node (0 for a basic placement).
    pub index: u32,
}

impl VirtualNode {
    #[inline]
    pub fn new(token: Token, index: u32) -> Self {
        Self { token, index }
    }

    /// The single position of a node on a ring without virtual nodes.
    ///
    /// This is the hash of the bare node key.
    pub fn primary(node: &NodeKey) -> Self {
        Self::new(Token::from_bytes(node.as_str().as_bytes()), 0)
    }

    /// Create a virtual node from a node key and vnode index.
    ///
    /// The token is the hash of `"node_key:vnode_index"`.
    pub fn from_index(node: &NodeKey, vnode_index: u32) -> Self {
        let vnode_key = format!("{}:{}", node, vnode_index);
        Self::new(Token::from_bytes(vnode_key.as_bytes()), vnode_index)
    }

    #[inline]
    pub fn token(&self) -> Token {
        self.token
    }

    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl std::fmt::Display for VirtualNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VNode(token={}, index={})", self.token, self.index)
    }
}

/// Every position `node` occupies on a ring with `vnodes` virtual nodes per node.
///
/// `vnodes` must already be validated as non-zero; a count of one yields the
/// basic placement.
pub fn placements(node: &NodeKey, vnodes: u32) -> Vec<VirtualNode> {
    if vnodes <= 1 {
        return vec![VirtualNode::primary(node)];
    }
    (0..vnodes)
        .map(|i| VirtualNode::from_index(node, i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> NodeKey {
        NodeKey::new(s).unwrap()
    }

    #[test]
    fn test_vnode_creation() {
        let vnode = VirtualNode::new(Token(100), 3);
        assert_eq!(vnode.token(), Token(100));
        assert_eq!(vnode.index(), 3);
    }

    #[test]
    fn test_vnode_from_index() {
        let node = key("node1");
        let vnode0 = VirtualNode::from_index(&node, 0);
        let vnode1 = VirtualNode::from_index(&node, 1);

        assert_ne!(vnode0.token(), vnode1.token());
        assert_eq!(vnode0.token(), Token::from_key("node1:0").unwrap());
        assert_eq!(vnode1.token(), Token::from_key("node1:1").unwrap());
    }

    #[test]
    fn test_basic_placement_hashes_bare_key() {
        let node = key("node1");
        let placed = placements(&node, 1);
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].token(), Token::from_key("node1").unwrap());
    }

    #[test]
    fn test_virtual_placement_count() {
        let placed = placements(&key("node1"), 16);
        assert_eq!(placed.len(), 16);
        assert!(placed.iter().enumerate().all(|(i, v)| v.index() == i as u32));
    }

    #[test]
    fn test_vnode_ordering() {
        let vnode1 = VirtualNode::new(Token(100), 1);
        let vnode2 = VirtualNode::new(Token(200), 0);

        assert!(vnode1 < vnode2); // Ordered by token first
    }
}
