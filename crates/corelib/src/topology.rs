//! Ring topology snapshots.
//!
//! A [`Topology`] is an immutable copy of the ring taken under one read lock.
//! It answers the same lookups as the live ring (binary search over a sorted
//! vector) and adds ownership analysis: which arc of the ring each position
//! covers and what share of the token space each node owns.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::node::NodeKey;
use crate::ring::table::{check_replication, distinct_owners};
use crate::token::{Token, RING_SIZE};

/// The arc of the ring owned by one position.
///
/// Covers tokens after `start` up to and including `end`, wrapping past
/// [`Token::MAX`]. When `start == end` the ring has a single position and the
/// range is the whole ring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRange {
    pub start: Token,
    pub end: Token,
    pub owner: NodeKey,
}

impl TokenRange {
    /// Number of tokens in the arc.
    pub fn len(&self) -> u64 {
        if self.start == self.end {
            RING_SIZE
        } else {
            self.start.distance_to(&self.end)
        }
    }

    /// Always false; every range covers at least one token.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, token: Token) -> bool {
        if self.start == self.end {
            true
        } else if self.start < self.end {
            self.start < token && token <= self.end
        } else {
            token > self.start || token <= self.end
        }
    }
}

/// Immutable snapshot of a ring.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    vnodes: u32,
    positions: Vec<(Token, NodeKey)>,
    node_count: usize,
}

impl Topology {
    /// `positions` must be sorted by token and duplicate-free.
    pub(crate) fn new(vnodes: u32, positions: Vec<(Token, NodeKey)>, node_count: usize) -> Self {
        debug_assert!(positions.windows(2).all(|w| w[0].0 < w[1].0));
        Self {
            vnodes,
            positions,
            node_count,
        }
    }

    pub fn virtual_nodes(&self) -> u32 {
        self.vnodes
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Positions in ring order.
    pub fn positions(&self) -> &[(Token, NodeKey)] {
        &self.positions
    }

    /// Index of the first position at or after `token`, wrapping to 0.
    fn start_index(&self, token: Token) -> usize {
        let idx = self.positions.partition_point(|(position, _)| *position < token);
        if idx == self.positions.len() {
            0
        } else {
            idx
        }
    }

    /// Same result as [`HashRing::find_node_for`](crate::HashRing::find_node_for)
    /// on the ring this snapshot was taken from.
    pub fn find_node_for(&self, key: &str) -> Result<NodeKey> {
        let token = Token::from_key(key)?;
        if self.positions.is_empty() {
            return Err(Error::FailedPrecondition(
                "ring has no positions; add a node first".into(),
            ));
        }
        Ok(self.positions[self.start_index(token)].1.clone())
    }

    /// Same result as [`HashRing::find_nodes_for`](crate::HashRing::find_nodes_for)
    /// on the ring this snapshot was taken from.
    pub fn find_nodes_for(&self, key: &str, replication_factor: usize) -> Result<Vec<NodeKey>> {
        let token = Token::from_key(key)?;
        check_replication(replication_factor, self.node_count)?;

        let start = self.start_index(token);
        let (before, after) = self.positions.split_at(start);
        let walk = after.iter().chain(before).map(|(_, owner)| owner);
        Ok(distinct_owners(walk, replication_factor))
    }

    /// The arc each position owns, in ring order.
    pub fn ranges(&self) -> Vec<TokenRange> {
        let Some((last, _)) = self.positions.last() else {
            return Vec::new();
        };
        let mut prev = *last;
        self.positions
            .iter()
            .map(|(token, owner)| {
                let range = TokenRange {
                    start: prev,
                    end: *token,
                    owner: owner.clone(),
                };
                prev = *token;
                range
            })
            .collect()
    }

    /// Share of the token space each node owns. Sums to 1.0 on a non-empty ring.
    pub fn ownership(&self) -> BTreeMap<NodeKey, f64> {
        let mut owned: BTreeMap<NodeKey, u64> = BTreeMap::new();
        for range in self.ranges() {
            *owned.entry(range.owner.clone()).or_default() += range.len();
        }
        owned
            .into_iter()
            .map(|(node, tokens)| (node, tokens as f64 / RING_SIZE as f64))
            .collect()
    }
}
