use std::sync::Arc;

use async_trait::async_trait;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature},
};

use super::rpc::SolanaClient;
use super::token::TokenClient;
use crate::ports::{ChainError, ChainPort};

/// Production [`ChainPort`] backed by a Solana RPC node.
///
/// Composes the plain RPC wrapper with the token-program client so the
/// application layer sees one surface.
#[derive(Clone)]
pub struct SolanaChain {
    rpc: SolanaClient,
    token: TokenClient,
}

impl SolanaChain {
    pub fn new(rpc: SolanaClient) -> Self {
        let token = TokenClient::new(&rpc);
        Self { rpc, token }
    }
}

#[async_trait]
impl ChainPort for SolanaChain {
    async fn native_balance(&self, owner: &Pubkey) -> Result<u64, ChainError> {
        self.rpc.get_balance(owner).await
    }

    async fn request_airdrop(
        &self,
        owner: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, ChainError> {
        self.rpc.request_airdrop(owner, lamports).await
    }

    async fn wait_for_confirmation(&self, signature: &Signature) -> Result<(), ChainError> {
        self.rpc.wait_for_confirmation(signature).await
    }

    async fn create_mint(
        &self,
        payer: Arc<Keypair>,
        decimals: u8,
    ) -> Result<(Pubkey, Signature), ChainError> {
        self.token.create_mint(payer, decimals).await
    }

    async fn resolve_token_account(
        &self,
        payer: Arc<Keypair>,
        owner: &Pubkey,
        mint: &Pubkey,
    ) -> Result<Pubkey, ChainError> {
        self.token.resolve_associated_account(payer, owner, mint).await
    }

    async fn token_balance(&self, account: &Pubkey) -> Result<u64, ChainError> {
        self.rpc.get_token_account_balance(account).await
    }

    async fn mint_supply(
        &self,
        authority: Arc<Keypair>,
        mint: &Pubkey,
        destination: &Pubkey,
        base_units: u64,
    ) -> Result<Signature, ChainError> {
        self.token
            .mint_to(authority, mint, destination, base_units)
            .await
    }

    async fn transfer(
        &self,
        owner: Arc<Keypair>,
        mint: &Pubkey,
        source: &Pubkey,
        destination: &Pubkey,
        base_units: u64,
        decimals: u8,
    ) -> Result<Signature, ChainError> {
        self.token
            .transfer(owner, mint, source, destination, base_units, decimals)
            .await
    }

    async fn burn(
        &self,
        owner: Arc<Keypair>,
        mint: &Pubkey,
        account: &Pubkey,
        base_units: u64,
        decimals: u8,
    ) -> Result<Signature, ChainError> {
        self.token
            .burn(owner, mint, account, base_units, decimals)
            .await
    }

    async fn revoke_mint_authority(
        &self,
        authority: Arc<Keypair>,
        mint: &Pubkey,
    ) -> Result<Signature, ChainError> {
        self.token.revoke_mint_authority(authority, mint).await
    }
}
