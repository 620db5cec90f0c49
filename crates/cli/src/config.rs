//! Command-line configuration.
//!
//! The ring is described by an optional JSON file (see [`RingConfig`]) and
//! then adjusted by flags: `--vnodes` replaces the file's count and every
//! `--node` is appended to the file's node list.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use corelib::{HashRing, RingConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::commands::Command;

#[derive(Debug, Parser)]
#[command(
    name = "hashring",
    version,
    about = "Inspect key placement on a consistent hash ring"
)]
pub struct CliConfig {
    /// JSON ring config: {"virtual_nodes": 64, "nodes": ["a", "b"]}.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Virtual nodes per node (overrides the config file).
    #[arg(long, global = true)]
    pub vnodes: Option<u32>,

    /// Node key to place on the ring. Repeatable.
    #[arg(long = "node", global = true)]
    pub nodes: Vec<String>,

    /// Log level when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// Merges the config file (if any) with command-line overrides.
    pub fn ring_config(&self) -> anyhow::Result<RingConfig> {
        let mut config = match &self.config {
            Some(path) => RingConfig::from_path(path)
                .with_context(|| format!("loading ring config from {}", path.display()))?,
            None => RingConfig::default(),
        };
        if let Some(vnodes) = self.vnodes {
            config.virtual_nodes = vnodes;
        }
        config.nodes.extend(self.nodes.iter().cloned());
        Ok(config)
    }

    pub fn run(self) -> anyhow::Result<()> {
        setup_tracing(&self.log_level);

        let ring_config = self.ring_config()?;
        debug!(
            vnodes = ring_config.virtual_nodes,
            nodes = ring_config.nodes.len(),
            "building ring"
        );
        let ring = HashRing::from_config(&ring_config).context("building ring")?;

        let result = self.command.execute(&ring)?;
        println!("{}", result.render(self.json)?);
        Ok(())
    }
}

/// Initialize the `tracing` subscriber with the given level filter.
///
/// Respects `RUST_LOG` env var if set, otherwise uses the flag value.
fn setup_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
