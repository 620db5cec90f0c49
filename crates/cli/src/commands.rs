//! Subcommands and their rendered results.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use clap::Subcommand;
use corelib::HashRing;
use replication::{ReplicationStrategy, SimpleStrategy};
use serde::Serialize;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show which node(s) own a key.
    Lookup {
        key: String,
        /// Distinct nodes to return, walking clockwise from the owner.
        #[arg(long, default_value_t = 1)]
        replicas: usize,
    },
    /// Hash synthetic keys and report how evenly they spread.
    Distribution {
        /// Number of keys to place.
        #[arg(long, default_value_t = 100_000)]
        keys: usize,
    },
    /// Dump every ring position in order.
    Positions,
}

/// Output of one command, printable as text or JSON.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum CommandResult {
    Lookup {
        key: String,
        nodes: Vec<String>,
        degraded: bool,
    },
    Distribution(DistributionReport),
    Positions { positions: Vec<PositionEntry> },
}

#[derive(Debug, Clone, Serialize)]
pub struct DistributionReport {
    pub keys: usize,
    pub virtual_nodes: u32,
    pub nodes: BTreeMap<String, NodeLoad>,
    /// Standard deviation of per-node key counts.
    pub std_dev: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeLoad {
    pub keys: usize,
    /// Share of the token space owned, 0.0 ..= 1.0.
    pub ownership: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PositionEntry {
    pub token: u32,
    pub node: String,
}

impl Command {
    pub fn execute(&self, ring: &HashRing) -> anyhow::Result<CommandResult> {
        match self {
            Command::Lookup { key, replicas } => {
                let placement = SimpleStrategy::new(*replicas).replicas_for_key(ring, key)?;
                Ok(CommandResult::Lookup {
                    key: key.clone(),
                    degraded: placement.is_degraded(),
                    nodes: placement.into_replicas().into_iter().map(String::from).collect(),
                })
            }
            Command::Distribution { keys } => distribution(ring, *keys),
            Command::Positions => Ok(CommandResult::Positions {
                positions: ring
                    .positions()
                    .into_iter()
                    .map(|(token, node)| PositionEntry {
                        token: token.0,
                        node: node.into(),
                    })
                    .collect(),
            }),
        }
    }
}

fn distribution(ring: &HashRing, keys: usize) -> anyhow::Result<CommandResult> {
    // Snapshot once so the keys are placed without touching the ring lock.
    let topology = ring.topology();

    let mut nodes: BTreeMap<String, NodeLoad> = topology
        .ownership()
        .into_iter()
        .map(|(node, ownership)| (node.into(), NodeLoad { keys: 0, ownership }))
        .collect();

    for i in 0..keys {
        let owner = topology.find_node_for(&format!("key-{i}"))?;
        if let Some(load) = nodes.get_mut(owner.as_str()) {
            load.keys += 1;
        }
    }

    let std_dev = if nodes.is_empty() {
        0.0
    } else {
        let mean = keys as f64 / nodes.len() as f64;
        let variance = nodes
            .values()
            .map(|load| (load.keys as f64 - mean).powi(2))
            .sum::<f64>()
            / nodes.len() as f64;
        variance.sqrt()
    };

    Ok(CommandResult::Distribution(DistributionReport {
        keys,
        virtual_nodes: topology.virtual_nodes(),
        nodes,
        std_dev,
    }))
}

impl CommandResult {
    pub fn render(&self, json: bool) -> anyhow::Result<String> {
        if json {
            return Ok(serde_json::to_string_pretty(self)?);
        }

        let mut out = String::new();
        match self {
            CommandResult::Lookup {
                key,
                nodes,
                degraded,
            } => {
                writeln!(out, "{key} -> {}", nodes.join(", "))?;
                if *degraded {
                    writeln!(out, "warning: fewer replicas than requested")?;
                }
            }
            CommandResult::Distribution(report) => {
                writeln!(
                    out,
                    "{} keys over {} nodes ({} vnodes each)",
                    report.keys,
                    report.nodes.len(),
                    report.virtual_nodes
                )?;
                for (node, load) in &report.nodes {
                    writeln!(
                        out,
                        "{node:<24} {:>10} keys {:>8.3}% of ring",
                        load.keys,
                        load.ownership * 100.0
                    )?;
                }
                writeln!(out, "std dev: {:.2}", report.std_dev)?;
            }
            CommandResult::Positions { positions } => {
                for entry in positions {
                    writeln!(out, "{:08x} {}", entry.token, entry.node)?;
                }
            }
        }
        Ok(out.trim_end().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::RingBuilder;

    fn ring() -> HashRing {
        RingBuilder::new()
            .with_vnodes(32)
            .add_nodes(["a", "b", "c"])
            .build()
            .unwrap()
    }

    #[test]
    fn test_lookup() {
        let ring = ring();
        let result = Command::Lookup {
            key: "user:1".into(),
            replicas: 2,
        }
        .execute(&ring)
        .unwrap();
        let CommandResult::Lookup { nodes, degraded, .. } = &result else {
            panic!("expected lookup result, got {result:?}");
        };
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0], ring.find_node_for("user:1").unwrap().as_str());
        assert!(!degraded);
        assert!(result.render(false).unwrap().starts_with("user:1 -> "));
    }

    #[test]
    fn test_lookup_on_empty_ring_fails() {
        let err = Command::Lookup {
            key: "user:1".into(),
            replicas: 1,
        }
        .execute(&HashRing::new())
        .unwrap_err();
        assert!(err.to_string().contains("no positions"));
    }

    #[test]
    fn test_distribution_counts_every_key() {
        let result = Command::Distribution { keys: 3_000 }.execute(&ring()).unwrap();
        let CommandResult::Distribution(report) = &result else {
            panic!("expected distribution result, got {result:?}");
        };
        assert_eq!(report.nodes.len(), 3);
        assert_eq!(report.nodes.values().map(|l| l.keys).sum::<usize>(), 3_000);
        let owned: f64 = report.nodes.values().map(|l| l.ownership).sum();
        assert!((owned - 1.0).abs() < 1e-9);

        let json: serde_json::Value = serde_json::from_str(&result.render(true).unwrap()).unwrap();
        assert_eq!(json["command"], "distribution");
        assert_eq!(json["keys"], 3_000);
    }

    #[test]
    fn test_positions() {
        let result = Command::Positions.execute(&ring()).unwrap();
        let text = result.render(false).unwrap();
        assert_eq!(text.lines().count(), 96);
    }
}
