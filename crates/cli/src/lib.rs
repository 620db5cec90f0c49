//! CLI tool for inspecting consistent hash rings.
//!
//! Provides commands for:
//! - Looking up the owner (and replicas) of a key
//! - Measuring how evenly keys spread across nodes
//! - Dumping ring positions

pub mod commands;
pub mod config;

pub use commands::{Command, CommandResult};
pub use config::CliConfig;
