//! Property tests for the ring's consistent-hashing guarantees.

use std::collections::BTreeSet;

use corelib::{Error, HashRing, RingBuilder};
use proptest::prelude::*;

fn node_set() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set("[a-z]{1,6}-[0-9]{1,3}", 2..8)
}

fn lookup_key() -> impl Strategy<Value = String> {
    "[ -~]{0,24}".prop_filter("blank keys are invalid", |k| !k.trim().is_empty())
}

fn ring_with(nodes: &BTreeSet<String>, vnodes: u32) -> HashRing {
    RingBuilder::new()
        .with_vnodes(vnodes)
        .add_nodes(nodes.iter().cloned())
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn lookup_is_deterministic(nodes in node_set(), vnodes in 1u32..32, key in lookup_key()) {
        let ring = ring_with(&nodes, vnodes);
        let first = ring.find_node_for(&key).unwrap();
        prop_assert_eq!(ring.find_node_for(&key).unwrap(), first.clone());
        prop_assert!(nodes.contains(first.as_str()));
    }

    #[test]
    fn removal_only_remaps_removed_node(
        nodes in node_set(),
        vnodes in 1u32..32,
        victim in any::<prop::sample::Index>(),
        keys in prop::collection::vec(lookup_key(), 1..64),
    ) {
        let ring = ring_with(&nodes, vnodes);
        let victim = victim.get(&nodes.iter().collect::<Vec<_>>()).to_string();
        let before: Vec<_> = keys.iter().map(|k| ring.find_node_for(k).unwrap()).collect();

        prop_assert!(ring.remove_node(&victim).unwrap());

        for (key, owner) in keys.iter().zip(before) {
            let now = ring.find_node_for(key).unwrap();
            if owner != victim.as_str() {
                prop_assert_eq!(now, owner);
            } else {
                prop_assert_ne!(now, victim.as_str());
            }
        }
    }

    #[test]
    fn add_then_remove_restores_assignment(
        nodes in node_set(),
        vnodes in 1u32..16,
        keys in prop::collection::vec(lookup_key(), 1..64),
    ) {
        let ring = ring_with(&nodes, vnodes);
        let before: Vec<_> = keys.iter().map(|k| ring.find_node_for(k).unwrap()).collect();
        let positions = ring.position_count();

        prop_assume!(ring.add_node("joiner").unwrap());
        prop_assert!(ring.remove_node("joiner").unwrap());

        prop_assert_eq!(ring.position_count(), positions);
        let after: Vec<_> = keys.iter().map(|k| ring.find_node_for(k).unwrap()).collect();
        prop_assert_eq!(after, before);
    }

    #[test]
    fn replicas_are_distinct_and_bounded(
        nodes in node_set(),
        vnodes in 1u32..16,
        key in lookup_key(),
        extra in 1usize..4,
    ) {
        let ring = ring_with(&nodes, vnodes);
        for rf in 0..=nodes.len() {
            let replicas = ring.find_nodes_for(&key, rf).unwrap();
            prop_assert_eq!(replicas.len(), rf);
            let unique: BTreeSet<_> = replicas.iter().collect();
            prop_assert_eq!(unique.len(), rf);
        }
        let too_many = nodes.len() + extra;
        prop_assert_eq!(
            ring.find_nodes_for(&key, too_many),
            Err(Error::OutOfRange { requested: too_many, available: nodes.len() })
        );
    }

    #[test]
    fn ownership_covers_ring(nodes in node_set(), vnodes in 1u32..64) {
        let topology = ring_with(&nodes, vnodes).topology();
        let total: f64 = topology.ownership().values().sum();
        prop_assert!((total - 1.0).abs() < 1e-9);
        prop_assert_eq!(topology.ownership().len(), nodes.len());
    }
}
