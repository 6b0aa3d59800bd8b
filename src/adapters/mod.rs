//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits:
//! - Solana: RPC client, token program client and wallet management
//! - CLI: Command-line argument definitions

pub mod cli;
pub mod solana;

pub use cli::CliApp;
pub use solana::{SolanaChain, SolanaClient, TokenClient, WalletManager};
