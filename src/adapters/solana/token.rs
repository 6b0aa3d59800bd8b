use std::sync::Arc;

use solana_client::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    program_pack::Pack,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    system_instruction,
    transaction::Transaction,
};
use spl_associated_token_account::{
    get_associated_token_address, instruction::create_associated_token_account_idempotent,
};
use spl_token::{instruction, state::Mint};

use super::rpc::SolanaClient;
use crate::ports::ChainError;

/// SPL token program operations: mint creation, associated accounts,
/// supply issuance, transfers, burns and authority changes.
///
/// Every method assembles a single transaction, signs it with the provided
/// keypair(s) and waits for confirmation before returning.
#[derive(Clone)]
pub struct TokenClient {
    client: Arc<RpcClient>,
    commitment: CommitmentConfig,
}

impl TokenClient {
    /// Build a token client sharing the RPC connection of `solana`.
    pub fn new(solana: &SolanaClient) -> Self {
        Self {
            client: solana.rpc(),
            commitment: solana.commitment(),
        }
    }

    /// Create a new mint account with `payer` as mint and freeze authority.
    ///
    /// Funds the account at the rent-exempt minimum for `Mint::LEN` and
    /// initializes it in the same transaction. The mint keypair is generated
    /// here and co-signs; it is not needed afterwards.
    pub async fn create_mint(
        &self,
        payer: Arc<Keypair>,
        decimals: u8,
    ) -> Result<(Pubkey, Signature), ChainError> {
        let client = Arc::clone(&self.client);
        tokio::task::spawn_blocking(move || {
            let mint = Keypair::new();
            let mint_pubkey = mint.pubkey();

            let rent = client
                .get_minimum_balance_for_rent_exemption(Mint::LEN)
                .map_err(|e| ChainError::Rpc(e.to_string()))?;
            let instructions = [
                system_instruction::create_account(
                    &payer.pubkey(),
                    &mint_pubkey,
                    rent,
                    Mint::LEN as u64,
                    &spl_token::id(),
                ),
                instruction::initialize_mint(
                    &spl_token::id(),
                    &mint_pubkey,
                    &payer.pubkey(),
                    Some(&payer.pubkey()),
                    decimals,
                )
                .map_err(|e| ChainError::Instruction(e.to_string()))?,
            ];

            let blockhash = client
                .get_latest_blockhash()
                .map_err(|e| ChainError::Rpc(e.to_string()))?;
            let transaction = Transaction::new_signed_with_payer(
                &instructions,
                Some(&payer.pubkey()),
                &[payer.as_ref(), &mint],
                blockhash,
            );
            let signature = client
                .send_and_confirm_transaction(&transaction)
                .map_err(|e| ChainError::Transaction(e.to_string()))?;

            Ok((mint_pubkey, signature))
        })
        .await
        .map_err(|e| ChainError::Rpc(format!("Task join error: {}", e)))?
    }

    /// Find or create the associated token account of `owner` for `mint`.
    ///
    /// The address is derived locally; a creation transaction is only sent
    /// when the account does not exist yet. The create instruction is the
    /// idempotent variant, so a concurrent creation cannot fail the run.
    pub async fn resolve_associated_account(
        &self,
        payer: Arc<Keypair>,
        owner: &Pubkey,
        mint: &Pubkey,
    ) -> Result<Pubkey, ChainError> {
        let owner = *owner;
        let mint = *mint;
        let commitment = self.commitment;

        let client = Arc::clone(&self.client);
        tokio::task::spawn_blocking(move || {
            let address = get_associated_token_address(&owner, &mint);

            let existing = client
                .get_account_with_commitment(&address, commitment)
                .map_err(|e| ChainError::Rpc(e.to_string()))?
                .value;
            if existing.is_none() {
                let create = create_associated_token_account_idempotent(
                    &payer.pubkey(),
                    &owner,
                    &mint,
                    &spl_token::id(),
                );

                let blockhash = client
                    .get_latest_blockhash()
                    .map_err(|e| ChainError::Rpc(e.to_string()))?;
                let transaction = Transaction::new_signed_with_payer(
                    &[create],
                    Some(&payer.pubkey()),
                    &[payer.as_ref()],
                    blockhash,
                );
                client
                    .send_and_confirm_transaction(&transaction)
                    .map_err(|e| ChainError::Transaction(e.to_string()))?;
            }

            Ok(address)
        })
        .await
        .map_err(|e| ChainError::Rpc(format!("Task join error: {}", e)))?
    }

    /// Mint `base_units` of new supply into `destination`.
    pub async fn mint_to(
        &self,
        authority: Arc<Keypair>,
        mint: &Pubkey,
        destination: &Pubkey,
        base_units: u64,
    ) -> Result<Signature, ChainError> {
        let mint = *mint;
        let destination = *destination;

        let client = Arc::clone(&self.client);
        tokio::task::spawn_blocking(move || {
            let mint_to = instruction::mint_to(
                &spl_token::id(),
                &mint,
                &destination,
                &authority.pubkey(),
                &[],
                base_units,
            )
            .map_err(|e| ChainError::Instruction(e.to_string()))?;

            let blockhash = client
                .get_latest_blockhash()
                .map_err(|e| ChainError::Rpc(e.to_string()))?;
            let transaction = Transaction::new_signed_with_payer(
                &[mint_to],
                Some(&authority.pubkey()),
                &[authority.as_ref()],
                blockhash,
            );
            client
                .send_and_confirm_transaction(&transaction)
                .map_err(|e| ChainError::Transaction(e.to_string()))
        })
        .await
        .map_err(|e| ChainError::Rpc(format!("Task join error: {}", e)))?
    }

    /// Move `base_units` from `source` to `destination`.
    ///
    /// Uses the checked variant so the token program rejects the transfer
    /// if `decimals` does not match the mint.
    pub async fn transfer(
        &self,
        owner: Arc<Keypair>,
        mint: &Pubkey,
        source: &Pubkey,
        destination: &Pubkey,
        base_units: u64,
        decimals: u8,
    ) -> Result<Signature, ChainError> {
        let mint = *mint;
        let source = *source;
        let destination = *destination;

        let client = Arc::clone(&self.client);
        tokio::task::spawn_blocking(move || {
            let transfer = instruction::transfer_checked(
                &spl_token::id(),
                &source,
                &mint,
                &destination,
                &owner.pubkey(),
                &[],
                base_units,
                decimals,
            )
            .map_err(|e| ChainError::Instruction(e.to_string()))?;

            let blockhash = client
                .get_latest_blockhash()
                .map_err(|e| ChainError::Rpc(e.to_string()))?;
            let transaction = Transaction::new_signed_with_payer(
                &[transfer],
                Some(&owner.pubkey()),
                &[owner.as_ref()],
                blockhash,
            );
            client
                .send_and_confirm_transaction(&transaction)
                .map_err(|e| ChainError::Transaction(e.to_string()))
        })
        .await
        .map_err(|e| ChainError::Rpc(format!("Task join error: {}", e)))?
    }

    /// Burn `base_units` out of `account`, shrinking total supply.
    pub async fn burn(
        &self,
        owner: Arc<Keypair>,
        mint: &Pubkey,
        account: &Pubkey,
        base_units: u64,
        decimals: u8,
    ) -> Result<Signature, ChainError> {
        let mint = *mint;
        let account = *account;

        let client = Arc::clone(&self.client);
        tokio::task::spawn_blocking(move || {
            let burn = instruction::burn_checked(
                &spl_token::id(),
                &account,
                &mint,
                &owner.pubkey(),
                &[],
                base_units,
                decimals,
            )
            .map_err(|e| ChainError::Instruction(e.to_string()))?;

            let blockhash = client
                .get_latest_blockhash()
                .map_err(|e| ChainError::Rpc(e.to_string()))?;
            let transaction = Transaction::new_signed_with_payer(
                &[burn],
                Some(&owner.pubkey()),
                &[owner.as_ref()],
                blockhash,
            );
            client
                .send_and_confirm_transaction(&transaction)
                .map_err(|e| ChainError::Transaction(e.to_string()))
        })
        .await
        .map_err(|e| ChainError::Rpc(format!("Task join error: {}", e)))?
    }

    /// Clear the mint authority, permanently fixing the supply.
    pub async fn revoke_mint_authority(
        &self,
        authority: Arc<Keypair>,
        mint: &Pubkey,
    ) -> Result<Signature, ChainError> {
        let mint = *mint;

        let client = Arc::clone(&self.client);
        tokio::task::spawn_blocking(move || {
            let revoke = instruction::set_authority(
                &spl_token::id(),
                &mint,
                None,
                instruction::AuthorityType::MintTokens,
                &authority.pubkey(),
                &[],
            )
            .map_err(|e| ChainError::Instruction(e.to_string()))?;

            let blockhash = client
                .get_latest_blockhash()
                .map_err(|e| ChainError::Rpc(e.to_string()))?;
            let transaction = Transaction::new_signed_with_payer(
                &[revoke],
                Some(&authority.pubkey()),
                &[authority.as_ref()],
                blockhash,
            );
            client
                .send_and_confirm_transaction(&transaction)
                .map_err(|e| ChainError::Transaction(e.to_string()))
        })
        .await
        .map_err(|e| ChainError::Rpc(format!("Task join error: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_associated_address_is_deterministic() {
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let first = get_associated_token_address(&owner, &mint);
        let second = get_associated_token_address(&owner, &mint);
        assert_eq!(first, second);

        let other_owner = Pubkey::new_unique();
        assert_ne!(first, get_associated_token_address(&other_owner, &mint));
    }

    #[tokio::test]
    async fn test_client_creation() {
        let solana = SolanaClient::new(
            "https://api.devnet.solana.com".to_string(),
            CommitmentConfig::confirmed(),
        );
        let token = TokenClient::new(&solana);
        assert_eq!(token.commitment, CommitmentConfig::confirmed());
    }
}
