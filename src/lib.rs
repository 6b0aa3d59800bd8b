//! Tokensmith - SPL Token Lifecycle Runner Library
//!
//! Runs a fixed token lifecycle on Solana devnet: fund the wallet, create a
//! mint, mint supply, transfer and burn a slice of it, then revoke the mint
//! authority so the supply is fixed forever.
//!
//! # Modules
//!
//! - `domain`: Pure token arithmetic (base-unit scaling)
//! - `ports`: Trait abstraction over the chain (ChainPort) plus a mock ledger
//! - `adapters`: External implementations (Solana RPC, token program, CLI)
//! - `config`: Configuration loading and validation
//! - `application`: The lifecycle orchestrator

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
