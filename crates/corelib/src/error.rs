//! Error types for the core library.

use crate::node::NodeKey;
use crate::token::Token;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core library.
///
/// Every variant is raised before the ring is mutated, so a failed call
/// leaves the ring exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Empty or whitespace-only key, or a zero virtual-node count.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// More replicas were requested than there are registered nodes.
    #[error("replication factor {requested} exceeds the {available} registered nodes")]
    OutOfRange {
        /// Replication factor asked for.
        requested: usize,
        /// Distinct nodes currently on the ring.
        available: usize,
    },

    /// Lookup on a ring that has no positions.
    #[error("failed precondition: {0}")]
    FailedPrecondition(String),

    /// One of the node's positions is already taken.
    #[error("position {position} for node {node} is already owned by {owner}")]
    PositionCollision {
        /// Node being added.
        node: NodeKey,
        /// Contested position.
        position: Token,
        /// Current owner of the position (may be `node` itself).
        owner: NodeKey,
    },

    /// Malformed ring configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The position table is inconsistent. This is a bug, never a user error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True when the error signals a broken invariant inside the ring.
    pub fn is_bug(&self) -> bool {
        matches!(self, Error::Internal(_))
    }

    /// Nothing inside the ring is retryable; callers decide at a higher level.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
