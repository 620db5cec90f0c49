//! Error types for replica placement.

/// Errors returned by replication strategies.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplicationError {
    /// The ring rejected the lookup (invalid key, empty ring, factor too large).
    #[error(transparent)]
    Ring(#[from] corelib::Error),

    /// Fewer distinct nodes were found than the strategy requires.
    #[error("key {key:?} placed on {found} of {requested} replicas")]
    Underreplicated {
        key: String,
        requested: usize,
        found: usize,
    },
}
