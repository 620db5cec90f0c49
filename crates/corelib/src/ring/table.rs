//! Position table: the complete state of a ring.
//!
//! The ordered position sequence and the position -> node mapping are one
//! `BTreeMap`, so positions are sorted and unique by construction. A secondary
//! index records which positions each node owns so removal never rescans the
//! ring. Only the methods here mutate either collection.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::error::{Error, Result};
use crate::node::NodeKey;
use crate::token::Token;

#[derive(Debug, Default, Clone)]
pub(crate) struct PositionTable {
    /// Ring position -> owning node.
    positions: BTreeMap<Token, NodeKey>,
    /// Node -> its positions, ascending.
    owned: HashMap<NodeKey, Vec<Token>>,
}

impl PositionTable {
    pub(crate) fn node_count(&self) -> usize {
        self.owned.len()
    }

    pub(crate) fn position_count(&self) -> usize {
        self.positions.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub(crate) fn contains_node(&self, node: &str) -> bool {
        self.owned.contains_key(node)
    }

    pub(crate) fn positions_of(&self, node: &str) -> Option<&[Token]> {
        self.owned.get(node).map(Vec::as_slice)
    }

    pub(crate) fn nodes(&self) -> impl Iterator<Item = &NodeKey> {
        self.owned.keys()
    }

    /// All positions in ring order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&Token, &NodeKey)> {
        self.positions.iter()
    }

    /// Places `node` at every token in `tokens`.
    ///
    /// Returns `Ok(false)` if the node is already registered. If any token is
    /// occupied (or repeated within `tokens`) nothing is inserted and the
    /// collision is returned.
    pub(crate) fn insert(&mut self, node: NodeKey, tokens: &[Token]) -> Result<bool> {
        if self.owned.contains_key(&node) {
            return Ok(false);
        }

        let mut staged = BTreeSet::new();
        for &token in tokens {
            if let Some(owner) = self.positions.get(&token) {
                return Err(Error::PositionCollision {
                    node,
                    position: token,
                    owner: owner.clone(),
                });
            }
            if !staged.insert(token) {
                return Err(Error::PositionCollision {
                    owner: node.clone(),
                    node,
                    position: token,
                });
            }
        }

        for &token in &staged {
            self.positions.insert(token, node.clone());
        }
        self.owned.insert(node, staged.into_iter().collect());
        Ok(true)
    }

    /// Drops `node` and every position it owns.
    ///
    /// Returns `Ok(false)` for an unknown node. The index is checked against
    /// the position map before anything is removed; a mismatch is reported as
    /// [`Error::Internal`] and the table is left untouched.
    pub(crate) fn remove(&mut self, node: &str) -> Result<bool> {
        let Some(tokens) = self.owned.get(node) else {
            return Ok(false);
        };

        for token in tokens {
            match self.positions.get(token) {
                Some(owner) if owner.as_str() == node => {}
                Some(owner) => {
                    return Err(Error::Internal(format!(
                        "position {token} indexed for {node} is owned by {owner}"
                    )))
                }
                None => {
                    return Err(Error::Internal(format!(
                        "position {token} indexed for {node} is missing from the ring"
                    )))
                }
            }
        }

        if let Some(tokens) = self.owned.remove(node) {
            for token in tokens {
                self.positions.remove(&token);
            }
        }
        Ok(true)
    }

    /// Owner of the first position at or after `token`, wrapping to the
    /// smallest position. `None` only when the table is empty.
    pub(crate) fn successor(&self, token: Token) -> Option<(Token, &NodeKey)> {
        self.positions
            .range(token..)
            .next()
            .or_else(|| self.positions.iter().next())
            .map(|(position, owner)| (*position, owner))
    }

    /// Owners of every position walking clockwise from `token`, wrapping once.
    pub(crate) fn walk(&self, token: Token) -> impl Iterator<Item = &NodeKey> {
        self.positions
            .range(token..)
            .chain(self.positions.range(..token))
            .map(|(_, owner)| owner)
    }
}

/// Checks a multi-result lookup against the ring's size.
///
/// `nodes` is the number of distinct registered nodes.
pub(crate) fn check_replication(replication_factor: usize, nodes: usize) -> Result<()> {
    if nodes == 0 {
        return Err(Error::FailedPrecondition(
            "ring has no positions; add a node first".into(),
        ));
    }
    if replication_factor > nodes {
        return Err(Error::OutOfRange {
            requested: replication_factor,
            available: nodes,
        });
    }
    Ok(())
}

/// Collects up to `count` distinct owners in walk order.
///
/// Stops early once `count` owners are found; a walk that runs out first
/// yields the shorter list.
pub(crate) fn distinct_owners<'a, I>(walk: I, count: usize) -> Vec<NodeKey>
where
    I: IntoIterator<Item = &'a NodeKey>,
{
    let mut owners = Vec::with_capacity(count);
    if count == 0 {
        return owners;
    }
    let mut seen = HashSet::with_capacity(count);
    for owner in walk {
        if seen.insert(owner) {
            owners.push(owner.clone());
            if owners.len() == count {
                break;
            }
        }
    }
    owners
}
