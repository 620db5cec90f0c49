//! Node abstractions for the consistent hash ring.
//!
//! Nodes are identified by an opaque string key. `NodeKey` wraps the key in an
//! `Arc<str>` so it is cheap to clone into every position the node owns.

use crate::error::{Error, Result};
use crate::token::validate_key;
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Validated identifier of a node on the ring.
///
/// Hashes and compares exactly like the underlying `str`, so maps keyed by
/// `NodeKey` can be queried with a plain `&str`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeKey(Arc<str>);

impl NodeKey {
    /// Validates and wraps a node key.
    pub fn new(key: &str) -> Result<Self> {
        validate_key(key)?;
        Ok(Self(Arc::from(key)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeKey({:?})", &*self.0)
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NodeKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for NodeKey {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for NodeKey {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl TryFrom<&str> for NodeKey {
    type Error = Error;

    fn try_from(key: &str) -> Result<Self> {
        Self::new(key)
    }
}

impl TryFrom<String> for NodeKey {
    type Error = Error;

    fn try_from(key: String) -> Result<Self> {
        validate_key(&key)?;
        Ok(Self(Arc::from(key)))
    }
}

impl From<NodeKey> for String {
    fn from(key: NodeKey) -> Self {
        key.0.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_node_key_validation() {
        assert!(NodeKey::new("cache-01").is_ok());
        assert!(NodeKey::new("").is_err());
        assert!(NodeKey::try_from(String::from("  ")).is_err());
    }

    #[test]
    fn test_lookup_by_str() {
        let mut owned = HashMap::new();
        owned.insert(NodeKey::new("a").unwrap(), 1);
        assert_eq!(owned.get("a"), Some(&1));
        assert_eq!(NodeKey::new("a").unwrap(), "a");
    }
}
