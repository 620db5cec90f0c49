//! JSON configuration for building a ring.
//!
//! Missing fields fall back to defaults; values are validated when the ring is
//! built with [`HashRing::from_config`](crate::HashRing::from_config).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Ring construction parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    /// Positions per node. Must be at least 1.
    pub virtual_nodes: u32,
    /// Node keys added in order.
    pub nodes: Vec<String>,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            virtual_nodes: 1,
            nodes: Vec::new(),
        }
    }
}

impl RingConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }
}
