//! Core library for consistent hashing implementation.
//!
//! This crate provides the fundamental abstractions for consistent hashing:
//! - Tokens: 32-bit ring positions derived from BLAKE3
//! - Node keys and virtual node placement
//! - The thread-safe hash ring and its builder
//! - Immutable topology snapshots for ownership analysis
//! - JSON ring configuration

pub mod config;
pub mod error;
pub mod node;
pub mod ring;
pub mod token;
pub mod topology;
pub mod vnode;

pub use config::RingConfig;
pub use error::{Error, Result};
pub use node::NodeKey;
pub use ring::{HashRing, Ring, RingBuilder};
pub use token::Token;
pub use topology::{TokenRange, Topology};
pub use vnode::VirtualNode;
