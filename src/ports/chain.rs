//! Chain Port
//!
//! Trait abstraction over the remote token network. The production
//! implementation (`adapters::solana::SolanaChain`) talks to a Solana RPC
//! node; `ports::mocks::MockChain` is an in-memory ledger for tests.
//!
//! Every state-changing operation confirms its transaction before
//! returning, so callers may treat completion as settled at the client's
//! commitment level.

use std::sync::Arc;

use async_trait::async_trait;
use solana_sdk::{pubkey::Pubkey, signature::Keypair, signature::Signature};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("RPC request failed: {0}")]
    Rpc(String),
    #[error("transaction failed: {0}")]
    Transaction(String),
    #[error("instruction build failed: {0}")]
    Instruction(String),
    #[error("token account {0} not found")]
    AccountNotFound(Pubkey),
    #[error("transaction {signature} not confirmed before block height {ceiling}")]
    ConfirmationExpired { signature: Signature, ceiling: u64 },
}

/// Operations the lifecycle needs from the remote network.
///
/// Signers are passed as `Arc<Keypair>` so implementations can move them
/// into blocking tasks without copying key material.
#[async_trait]
pub trait ChainPort: Send + Sync {
    /// Lamport balance of a wallet.
    async fn native_balance(&self, owner: &Pubkey) -> Result<u64, ChainError>;

    /// Request a test-network airdrop; returns the faucet transaction
    /// signature (not yet confirmed).
    async fn request_airdrop(&self, owner: &Pubkey, lamports: u64)
        -> Result<Signature, ChainError>;

    /// Block until `signature` reaches the configured commitment or its
    /// blockhash expires.
    async fn wait_for_confirmation(&self, signature: &Signature) -> Result<(), ChainError>;

    /// Create a new fungible-token mint with `payer` as both mint and
    /// freeze authority.
    async fn create_mint(
        &self,
        payer: Arc<Keypair>,
        decimals: u8,
    ) -> Result<(Pubkey, Signature), ChainError>;

    /// Find or create the associated token account of `owner` for `mint`.
    /// Idempotent: returns the existing account's address when present.
    async fn resolve_token_account(
        &self,
        payer: Arc<Keypair>,
        owner: &Pubkey,
        mint: &Pubkey,
    ) -> Result<Pubkey, ChainError>;

    /// Raw base-unit balance of a token account. The account must already
    /// exist remotely.
    async fn token_balance(&self, account: &Pubkey) -> Result<u64, ChainError>;

    /// Issue new supply into `destination`; `authority` must currently hold
    /// the mint authority.
    async fn mint_supply(
        &self,
        authority: Arc<Keypair>,
        mint: &Pubkey,
        destination: &Pubkey,
        base_units: u64,
    ) -> Result<Signature, ChainError>;

    /// Move base units between token accounts; `owner` signs for `source`.
    async fn transfer(
        &self,
        owner: Arc<Keypair>,
        mint: &Pubkey,
        source: &Pubkey,
        destination: &Pubkey,
        base_units: u64,
        decimals: u8,
    ) -> Result<Signature, ChainError>;

    /// Destroy base units held by `account`; `owner` signs.
    async fn burn(
        &self,
        owner: Arc<Keypair>,
        mint: &Pubkey,
        account: &Pubkey,
        base_units: u64,
        decimals: u8,
    ) -> Result<Signature, ChainError>;

    /// Permanently clear the mint authority so no further supply can ever
    /// be issued. Irreversible.
    async fn revoke_mint_authority(
        &self,
        authority: Arc<Keypair>,
        mint: &Pubkey,
    ) -> Result<Signature, ChainError>;
}
