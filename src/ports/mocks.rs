//! In-memory [`ChainPort`] implementation for tests.
//!
//! `MockChain` keeps a small token ledger and enforces the same rules the
//! token program would: unknown accounts, authority mismatches and
//! insufficient balances all fail. It records every call so tests can
//! assert ordering and early-abort behavior, and individual operations can
//! be scripted to fail.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
};
use spl_associated_token_account::get_associated_token_address;

use super::chain::{ChainError, ChainPort};

#[derive(Debug, Clone)]
struct MintRecord {
    decimals: u8,
    supply: u64,
    mint_authority: Option<Pubkey>,
    freeze_authority: Option<Pubkey>,
}

#[derive(Debug, Clone)]
struct TokenAccountRecord {
    mint: Pubkey,
    owner: Pubkey,
    amount: u64,
}

#[derive(Debug, Default)]
struct Ledger {
    lamports: HashMap<Pubkey, u64>,
    mints: HashMap<Pubkey, MintRecord>,
    accounts: HashMap<Pubkey, TokenAccountRecord>,
}

/// Mock chain port that records calls and allows scripted failures.
#[derive(Debug, Default)]
pub struct MockChain {
    ledger: Mutex<Ledger>,
    calls: Mutex<Vec<String>>,
    failures: Mutex<HashMap<String, String>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to pre-fund a wallet with lamports
    pub fn with_lamports(self, owner: &Pubkey, lamports: u64) -> Self {
        self.ledger.lock().unwrap().lamports.insert(*owner, lamports);
        self
    }

    /// Builder method to make the next call to `op` fail with `message`.
    /// `op` is the `ChainPort` method name, e.g. `"create_mint"`.
    pub fn fail_on(self, op: &str, message: &str) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(op.to_string(), message.to_string());
        self
    }

    /// Get all recorded calls, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Lamport balance of a wallet, zero if never funded.
    pub fn lamports_of(&self, owner: &Pubkey) -> u64 {
        self.ledger
            .lock()
            .unwrap()
            .lamports
            .get(owner)
            .copied()
            .unwrap_or(0)
    }

    /// Base-unit balance of a token account, `None` if it does not exist.
    pub fn token_balance_of(&self, account: &Pubkey) -> Option<u64> {
        self.ledger
            .lock()
            .unwrap()
            .accounts
            .get(account)
            .map(|record| record.amount)
    }

    /// Total issued supply of a mint.
    pub fn supply_of(&self, mint: &Pubkey) -> Option<u64> {
        self.ledger
            .lock()
            .unwrap()
            .mints
            .get(mint)
            .map(|record| record.supply)
    }

    /// Current mint authority, `None` once revoked (or for unknown mints).
    pub fn mint_authority_of(&self, mint: &Pubkey) -> Option<Pubkey> {
        self.ledger
            .lock()
            .unwrap()
            .mints
            .get(mint)
            .and_then(|record| record.mint_authority)
    }

    /// Current freeze authority.
    pub fn freeze_authority_of(&self, mint: &Pubkey) -> Option<Pubkey> {
        self.ledger
            .lock()
            .unwrap()
            .mints
            .get(mint)
            .and_then(|record| record.freeze_authority)
    }

    /// Record the call and surface a scripted failure, if any.
    fn begin(&self, op: &str) -> Result<(), ChainError> {
        self.calls.lock().unwrap().push(op.to_string());
        if let Some(message) = self.failures.lock().unwrap().remove(op) {
            return Err(ChainError::Transaction(message));
        }
        Ok(())
    }
}

#[async_trait]
impl ChainPort for MockChain {
    async fn native_balance(&self, owner: &Pubkey) -> Result<u64, ChainError> {
        self.begin("native_balance")?;
        Ok(self.lamports_of(owner))
    }

    async fn request_airdrop(
        &self,
        owner: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, ChainError> {
        self.begin("request_airdrop")?;
        let mut ledger = self.ledger.lock().unwrap();
        *ledger.lamports.entry(*owner).or_insert(0) += lamports;
        Ok(Signature::new_unique())
    }

    async fn wait_for_confirmation(&self, _signature: &Signature) -> Result<(), ChainError> {
        self.begin("wait_for_confirmation")?;
        Ok(())
    }

    async fn create_mint(
        &self,
        payer: Arc<Keypair>,
        decimals: u8,
    ) -> Result<(Pubkey, Signature), ChainError> {
        self.begin("create_mint")?;
        let mint = Pubkey::new_unique();
        let authority = payer.pubkey();
        self.ledger.lock().unwrap().mints.insert(
            mint,
            MintRecord {
                decimals,
                supply: 0,
                mint_authority: Some(authority),
                freeze_authority: Some(authority),
            },
        );
        Ok((mint, Signature::new_unique()))
    }

    async fn resolve_token_account(
        &self,
        _payer: Arc<Keypair>,
        owner: &Pubkey,
        mint: &Pubkey,
    ) -> Result<Pubkey, ChainError> {
        self.begin("resolve_token_account")?;
        let mut ledger = self.ledger.lock().unwrap();
        if !ledger.mints.contains_key(mint) {
            return Err(ChainError::Transaction(format!("unknown mint {}", mint)));
        }

        let address = get_associated_token_address(owner, mint);
        ledger
            .accounts
            .entry(address)
            .or_insert_with(|| TokenAccountRecord {
                mint: *mint,
                owner: *owner,
                amount: 0,
            });
        Ok(address)
    }

    async fn token_balance(&self, account: &Pubkey) -> Result<u64, ChainError> {
        self.begin("token_balance")?;
        self.token_balance_of(account)
            .ok_or(ChainError::AccountNotFound(*account))
    }

    async fn mint_supply(
        &self,
        authority: Arc<Keypair>,
        mint: &Pubkey,
        destination: &Pubkey,
        base_units: u64,
    ) -> Result<Signature, ChainError> {
        self.begin("mint_supply")?;
        let mut ledger = self.ledger.lock().unwrap();

        let record = ledger
            .mints
            .get(mint)
            .ok_or_else(|| ChainError::Transaction(format!("unknown mint {}", mint)))?;
        match record.mint_authority {
            Some(current) if current == authority.pubkey() => {}
            Some(_) => {
                return Err(ChainError::Transaction("owner does not match".to_string()));
            }
            None => {
                return Err(ChainError::Transaction(
                    "fixed supply: mint authority is revoked".to_string(),
                ));
            }
        }

        let account = ledger
            .accounts
            .get_mut(destination)
            .ok_or_else(|| ChainError::Transaction(format!("unknown token account {}", destination)))?;
        if account.mint != *mint {
            return Err(ChainError::Transaction("account mint mismatch".to_string()));
        }
        account.amount = account
            .amount
            .checked_add(base_units)
            .ok_or_else(|| ChainError::Transaction("balance overflow".to_string()))?;

        if let Some(record) = ledger.mints.get_mut(mint) {
            record.supply = record
                .supply
                .checked_add(base_units)
                .ok_or_else(|| ChainError::Transaction("supply overflow".to_string()))?;
        }
        Ok(Signature::new_unique())
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
        self.begin("transfer")?;
        let mut ledger = self.ledger.lock().unwrap();

        let mint_decimals = ledger
            .mints
            .get(mint)
            .map(|record| record.decimals)
            .ok_or_else(|| ChainError::Transaction(format!("unknown mint {}", mint)))?;
        if mint_decimals != decimals {
            return Err(ChainError::Transaction("decimals mismatch".to_string()));
        }

        let from = ledger
            .accounts
            .get(source)
            .ok_or_else(|| ChainError::Transaction(format!("unknown token account {}", source)))?;
        if from.owner != owner.pubkey() {
            return Err(ChainError::Transaction("owner does not match".to_string()));
        }
        if from.mint != *mint {
            return Err(ChainError::Transaction("account mint mismatch".to_string()));
        }
        if from.amount < base_units {
            return Err(ChainError::Transaction("insufficient funds".to_string()));
        }

        let to = ledger
            .accounts
            .get(destination)
            .ok_or_else(|| ChainError::Transaction(format!("unknown token account {}", destination)))?;
        if to.mint != *mint {
            return Err(ChainError::Transaction("account mint mismatch".to_string()));
        }

        if let Some(from) = ledger.accounts.get_mut(source) {
            from.amount -= base_units;
        }
        if let Some(to) = ledger.accounts.get_mut(destination) {
            to.amount = to
                .amount
                .checked_add(base_units)
                .ok_or_else(|| ChainError::Transaction("balance overflow".to_string()))?;
        }
        Ok(Signature::new_unique())
    }

    async fn burn(
        &self,
        owner: Arc<Keypair>,
        mint: &Pubkey,
        account: &Pubkey,
        base_units: u64,
        decimals: u8,
    ) -> Result<Signature, ChainError> {
        self.begin("burn")?;
        let mut ledger = self.ledger.lock().unwrap();

        let mint_decimals = ledger
            .mints
            .get(mint)
            .map(|record| record.decimals)
            .ok_or_else(|| ChainError::Transaction(format!("unknown mint {}", mint)))?;
        if mint_decimals != decimals {
            return Err(ChainError::Transaction("decimals mismatch".to_string()));
        }

        let holder = ledger
            .accounts
            .get_mut(account)
            .ok_or_else(|| ChainError::Transaction(format!("unknown token account {}", account)))?;
        if holder.owner != owner.pubkey() {
            return Err(ChainError::Transaction("owner does not match".to_string()));
        }
        if holder.mint != *mint {
            return Err(ChainError::Transaction("account mint mismatch".to_string()));
        }
        if holder.amount < base_units {
            return Err(ChainError::Transaction("insufficient funds".to_string()));
        }
        holder.amount -= base_units;

        if let Some(record) = ledger.mints.get_mut(mint) {
            record.supply = record.supply.saturating_sub(base_units);
        }
        Ok(Signature::new_unique())
    }

    async fn revoke_mint_authority(
        &self,
        authority: Arc<Keypair>,
        mint: &Pubkey,
    ) -> Result<Signature, ChainError> {
        self.begin("revoke_mint_authority")?;
        let mut ledger = self.ledger.lock().unwrap();

        let record = ledger
            .mints
            .get_mut(mint)
            .ok_or_else(|| ChainError::Transaction(format!("unknown mint {}", mint)))?;
        match record.mint_authority {
            Some(current) if current == authority.pubkey() => {
                record.mint_authority = None;
                Ok(Signature::new_unique())
            }
            Some(_) => Err(ChainError::Transaction("owner does not match".to_string())),
            None => Err(ChainError::Transaction(
                "mint authority already revoked".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_wallet() -> crate::adapters::solana::WalletManager {
        crate::adapters::solana::WalletManager::new_random()
    }

    #[tokio::test]
    async fn test_airdrop_accumulates() {
        let mock = MockChain::new();
        let owner = Pubkey::new_unique();

        mock.request_airdrop(&owner, 100).await.unwrap();
        mock.request_airdrop(&owner, 50).await.unwrap();

        assert_eq!(mock.native_balance(&owner).await.unwrap(), 150);
        assert_eq!(
            mock.calls(),
            vec!["request_airdrop", "request_airdrop", "native_balance"]
        );
    }

    #[tokio::test]
    async fn test_mint_and_resolve_flow() {
        let mock = MockChain::new();
        let wallet = test_wallet();

        let (mint, _) = mock.create_mint(wallet.signer(), 9).await.unwrap();
        let account = mock
            .resolve_token_account(wallet.signer(), &wallet.pubkey(), &mint)
            .await
            .unwrap();

        // Idempotent: resolving again yields the same address.
        let again = mock
            .resolve_token_account(wallet.signer(), &wallet.pubkey(), &mint)
            .await
            .unwrap();
        assert_eq!(account, again);

        mock.mint_supply(wallet.signer(), &mint, &account, 1_000)
            .await
            .unwrap();
        assert_eq!(mock.token_balance(&account).await.unwrap(), 1_000);
        assert_eq!(mock.supply_of(&mint), Some(1_000));
    }

    #[tokio::test]
    async fn test_burn_requires_sufficient_balance() {
        let mock = MockChain::new();
        let wallet = test_wallet();

        let (mint, _) = mock.create_mint(wallet.signer(), 9).await.unwrap();
        let account = mock
            .resolve_token_account(wallet.signer(), &wallet.pubkey(), &mint)
            .await
            .unwrap();
        mock.mint_supply(wallet.signer(), &mint, &account, 10)
            .await
            .unwrap();

        let result = mock.burn(wallet.signer(), &mint, &account, 11, 9).await;
        assert!(matches!(result, Err(ChainError::Transaction(_))));
        // Failed burn leaves the balance untouched.
        assert_eq!(mock.token_balance_of(&account), Some(10));
    }

    #[tokio::test]
    async fn test_minting_fails_after_revoke() {
        let mock = MockChain::new();
        let wallet = test_wallet();

        let (mint, _) = mock.create_mint(wallet.signer(), 9).await.unwrap();
        let account = mock
            .resolve_token_account(wallet.signer(), &wallet.pubkey(), &mint)
            .await
            .unwrap();
        mock.revoke_mint_authority(wallet.signer(), &mint)
            .await
            .unwrap();

        assert_eq!(mock.mint_authority_of(&mint), None);
        let result = mock.mint_supply(wallet.signer(), &mint, &account, 1).await;
        assert!(matches!(result, Err(ChainError::Transaction(_))));
    }

    #[tokio::test]
    async fn test_transfer_enforces_owner() {
        let mock = MockChain::new();
        let wallet = test_wallet();
        let stranger = test_wallet();

        let (mint, _) = mock.create_mint(wallet.signer(), 9).await.unwrap();
        let source = mock
            .resolve_token_account(wallet.signer(), &wallet.pubkey(), &mint)
            .await
            .unwrap();
        let destination = mock
            .resolve_token_account(wallet.signer(), &stranger.pubkey(), &mint)
            .await
            .unwrap();
        mock.mint_supply(wallet.signer(), &mint, &source, 100)
            .await
            .unwrap();

        let result = mock
            .transfer(stranger.signer(), &mint, &source, &destination, 10, 9)
            .await;
        assert!(matches!(result, Err(ChainError::Transaction(_))));
        assert_eq!(mock.token_balance_of(&source), Some(100));
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let mock = MockChain::new().fail_on("create_mint", "boom");
        let wallet = test_wallet();

        let result = mock.create_mint(wallet.signer(), 9).await;
        assert!(matches!(result, Err(ChainError::Transaction(message)) if message == "boom"));

        // One-shot: the next call succeeds.
        assert!(mock.create_mint(wallet.signer(), 9).await.is_ok());
    }
}
