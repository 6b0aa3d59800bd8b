//! Ports Layer - Trait definitions for external dependencies
//!
//! This module defines the interfaces (ports) that adapters must implement.
//! Following hexagonal architecture, the chain port abstracts the remote
//! token network so the lifecycle can run against a real RPC node or an
//! in-memory mock.

pub mod chain;
pub mod mocks;

pub use chain::{ChainError, ChainPort};
pub use mocks::MockChain;
