//! The result of placing one key.

use corelib::NodeKey;

/// Nodes chosen for a key, primary first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicaPlacement {
    requested: usize,
    replicas: Vec<NodeKey>,
}

impl ReplicaPlacement {
    pub fn new(requested: usize, replicas: Vec<NodeKey>) -> Self {
        Self {
            requested,
            replicas,
        }
    }

    /// The node that owns the key outright.
    pub fn primary(&self) -> Option<&NodeKey> {
        self.replicas.first()
    }

    /// Every replica except the primary.
    pub fn secondaries(&self) -> &[NodeKey] {
        self.replicas.get(1..).unwrap_or(&[])
    }

    pub fn replicas(&self) -> &[NodeKey] {
        &self.replicas
    }

    pub fn requested(&self) -> usize {
        self.requested
    }

    /// True when the ring walk ended before `requested` nodes were found.
    pub fn is_degraded(&self) -> bool {
        self.replicas.len() < self.requested
    }

    pub fn into_replicas(self) -> Vec<NodeKey> {
        self.replicas
    }
}
