//! Token Lifecycle Orchestrator
//!
//! Runs the fixed devnet sequence: fund the wallet, create a mint, resolve
//! the wallet's associated token account, mint supply, transfer, burn, and
//! finally revoke the mint authority. Steps run strictly in order; the
//! first failure aborts the run wrapped in the step's name.
//!
//! Nothing is rolled back on failure. A run that dies halfway leaves the
//! mint and accounts on devnet for the operator to inspect.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use solana_sdk::{pubkey::Pubkey, signature::Signature};
use thiserror::Error;

use crate::adapters::solana::WalletManager;
use crate::domain::amount::{self, AmountError};
use crate::ports::{ChainError, ChainPort};

/// The ordered steps of a lifecycle run, as they appear in logs and
/// error context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleStep {
    Funding,
    CreateMint,
    ResolveAccount,
    InitialBalance,
    MintSupply,
    BalanceAfterMint,
    Transfer,
    Burn,
    BalanceAfterBurn,
    RevokeAuthority,
}

impl fmt::Display for LifecycleStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleStep::Funding => "funding",
            LifecycleStep::CreateMint => "create-mint",
            LifecycleStep::ResolveAccount => "resolve-token-account",
            LifecycleStep::InitialBalance => "initial-balance",
            LifecycleStep::MintSupply => "mint-supply",
            LifecycleStep::BalanceAfterMint => "balance-after-mint",
            LifecycleStep::Transfer => "transfer",
            LifecycleStep::Burn => "burn",
            LifecycleStep::BalanceAfterBurn => "balance-after-burn",
            LifecycleStep::RevokeAuthority => "revoke-mint-authority",
        };
        write!(f, "{}", name)
    }
}

/// What actually went wrong inside a step.
#[derive(Debug, Error)]
pub enum StepFailure {
    #[error(transparent)]
    Chain(#[from] ChainError),
    #[error(transparent)]
    Amount(#[from] AmountError),
    #[error("invalid recipient address `{address}`: {reason}")]
    InvalidRecipient { address: String, reason: String },
}

/// A lifecycle failure, carrying the step it happened in.
#[derive(Debug, Error)]
#[error("step `{step}` failed: {source}")]
pub struct LifecycleError {
    pub step: LifecycleStep,
    #[source]
    pub source: StepFailure,
}

/// Attach step context to a fallible result.
trait StepContext<T> {
    fn in_step(self, step: LifecycleStep) -> Result<T, LifecycleError>;
}

impl<T, E: Into<StepFailure>> StepContext<T> for Result<T, E> {
    fn in_step(self, step: LifecycleStep) -> Result<T, LifecycleError> {
        self.map_err(|e| LifecycleError {
            step,
            source: e.into(),
        })
    }
}

/// Amounts and addresses for one run. Converted from [`crate::config::Config`].
#[derive(Debug, Clone)]
pub struct LifecycleSettings {
    /// Decimal places of the new mint
    pub decimals: u8,
    /// Lamports to request from the faucet
    pub airdrop_lamports: u64,
    /// Airdrop only when the wallet balance is below this
    pub min_balance_lamports: u64,
    /// Whole tokens to mint
    pub mint_amount: u64,
    /// Whole tokens to transfer to the recipient
    pub transfer_amount: u64,
    /// Whole tokens to burn
    pub burn_amount: u64,
    /// Base58 wallet address receiving the transfer
    pub recipient: String,
}

/// How the funding step concluded.
#[derive(Debug, Clone)]
pub enum FundingOutcome {
    /// Balance already met the threshold; no airdrop sent.
    Skipped { balance: u64 },
    /// Airdrop requested and confirmed.
    Airdropped {
        signature: Signature,
        balance_after: u64,
    },
}

/// Everything a successful run produced.
#[derive(Debug, Clone)]
pub struct LifecycleReport {
    pub wallet: Pubkey,
    pub funding: FundingOutcome,
    pub mint: Pubkey,
    pub token_account: Pubkey,
    pub initial_balance: u64,
    pub balance_after_mint: u64,
    pub transfer_signature: Signature,
    pub balance_after_burn: u64,
}

/// Drives the full token lifecycle against a [`ChainPort`].
pub struct TokenLifecycle {
    chain: Arc<dyn ChainPort>,
    wallet: WalletManager,
    settings: LifecycleSettings,
}

impl TokenLifecycle {
    pub fn new(
        chain: Arc<dyn ChainPort>,
        wallet: WalletManager,
        settings: LifecycleSettings,
    ) -> Self {
        Self {
            chain,
            wallet,
            settings,
        }
    }

    /// Run every step in order. The first failure aborts the run and names
    /// the step it happened in.
    pub async fn run(&self) -> Result<LifecycleReport, LifecycleError> {
        let wallet_pubkey = self.wallet.pubkey();
        let decimals = self.settings.decimals;

        tracing::info!("Starting token lifecycle - wallet: {}", wallet_pubkey);

        // 1. Make sure the wallet can pay fees and rent
        let funding = self
            .ensure_funded(&wallet_pubkey)
            .await
            .in_step(LifecycleStep::Funding)?;

        // 2. Create the mint, wallet as mint and freeze authority
        let (mint, signature) = self
            .chain
            .create_mint(self.wallet.signer(), decimals)
            .await
            .in_step(LifecycleStep::CreateMint)?;
        tracing::info!("Mint created: {} (tx {})", mint, signature);

        // 3. Resolve the wallet's associated token account
        let token_account = self
            .chain
            .resolve_token_account(self.wallet.signer(), &wallet_pubkey, &mint)
            .await
            .in_step(LifecycleStep::ResolveAccount)?;
        tracing::info!("Token account: {}", token_account);

        // 4. Balance before any supply exists
        let initial_balance = self
            .chain
            .token_balance(&token_account)
            .await
            .in_step(LifecycleStep::InitialBalance)?;
        tracing::info!("Initial balance: {} base units", initial_balance);

        // 5. Mint the configured supply into the wallet's account
        let base_units = amount::base_units(self.settings.mint_amount, decimals)
            .in_step(LifecycleStep::MintSupply)?;
        let signature = self
            .chain
            .mint_supply(self.wallet.signer(), &mint, &token_account, base_units)
            .await
            .in_step(LifecycleStep::MintSupply)?;
        tracing::info!(
            "Minted {} tokens ({} base units, tx {})",
            self.settings.mint_amount,
            base_units,
            signature
        );

        // 6. Balance after minting
        let balance_after_mint = self
            .chain
            .token_balance(&token_account)
            .await
            .in_step(LifecycleStep::BalanceAfterMint)?;
        tracing::info!("Balance after mint: {} base units", balance_after_mint);

        // 7. Transfer to the configured recipient
        let transfer_signature = self.transfer_tokens(&mint, &token_account).await?;

        // 8. Burn out of the wallet's account
        self.burn_tokens(&mint, &token_account).await?;

        // 9. Balance after transfer and burn
        let balance_after_burn = self
            .chain
            .token_balance(&token_account)
            .await
            .in_step(LifecycleStep::BalanceAfterBurn)?;
        tracing::info!("Balance after burn: {} base units", balance_after_burn);

        // 10. Revoke the mint authority; the supply is now fixed forever
        let signature = self
            .chain
            .revoke_mint_authority(self.wallet.signer(), &mint)
            .await
            .in_step(LifecycleStep::RevokeAuthority)?;
        tracing::info!("Mint authority revoked (tx {})", signature);

        Ok(LifecycleReport {
            wallet: wallet_pubkey,
            funding,
            mint,
            token_account,
            initial_balance,
            balance_after_mint,
            transfer_signature,
            balance_after_burn,
        })
    }

    /// Airdrop when the wallet balance is below the configured threshold.
    ///
    /// The airdrop is confirmed before proceeding, but devnet faucets are
    /// unreliable: if the balance still reads low afterwards the run
    /// continues with a warning and lets the first paid transaction decide.
    async fn ensure_funded(&self, wallet: &Pubkey) -> Result<FundingOutcome, StepFailure> {
        let balance = self.chain.native_balance(wallet).await?;
        if balance >= self.settings.min_balance_lamports {
            tracing::info!("Wallet holds {} lamports, skipping airdrop", balance);
            return Ok(FundingOutcome::Skipped { balance });
        }

        tracing::info!(
            "Wallet holds {} lamports, requesting {} from the faucet",
            balance,
            self.settings.airdrop_lamports
        );
        let signature = self
            .chain
            .request_airdrop(wallet, self.settings.airdrop_lamports)
            .await?;
        self.chain.wait_for_confirmation(&signature).await?;

        let balance_after = self.chain.native_balance(wallet).await?;
        if balance_after < self.settings.min_balance_lamports {
            tracing::warn!(
                "Airdrop confirmed but balance is still {} lamports; continuing anyway",
                balance_after
            );
        } else {
            tracing::info!("Airdrop confirmed, balance is now {} lamports", balance_after);
        }

        Ok(FundingOutcome::Airdropped {
            signature,
            balance_after,
        })
    }

    /// Parse the recipient, resolve their token account, and transfer.
    ///
    /// The recipient string is parsed before anything goes over the wire,
    /// so a malformed address cannot leave a half-done transfer step.
    async fn transfer_tokens(
        &self,
        mint: &Pubkey,
        source: &Pubkey,
    ) -> Result<Signature, LifecycleError> {
        let recipient = Pubkey::from_str(&self.settings.recipient)
            .map_err(|e| StepFailure::InvalidRecipient {
                address: self.settings.recipient.clone(),
                reason: e.to_string(),
            })
            .in_step(LifecycleStep::Transfer)?;

        let destination = self
            .chain
            .resolve_token_account(self.wallet.signer(), &recipient, mint)
            .await
            .in_step(LifecycleStep::Transfer)?;

        let base_units = amount::base_units(self.settings.transfer_amount, self.settings.decimals)
            .in_step(LifecycleStep::Transfer)?;
        let signature = self
            .chain
            .transfer(
                self.wallet.signer(),
                mint,
                source,
                &destination,
                base_units,
                self.settings.decimals,
            )
            .await
            .in_step(LifecycleStep::Transfer)?;
        tracing::info!(
            "Transferred {} tokens to {} (tx {})",
            self.settings.transfer_amount,
            recipient,
            signature
        );

        Ok(signature)
    }

    /// Burn the configured amount out of the wallet's account.
    async fn burn_tokens(
        &self,
        mint: &Pubkey,
        account: &Pubkey,
    ) -> Result<Signature, LifecycleError> {
        let base_units = amount::base_units(self.settings.burn_amount, self.settings.decimals)
            .in_step(LifecycleStep::Burn)?;
        let signature = self
            .chain
            .burn(
                self.wallet.signer(),
                mint,
                account,
                base_units,
                self.settings.decimals,
            )
            .await
            .in_step(LifecycleStep::Burn)?;
        tracing::info!(
            "Burned {} tokens (tx {})",
            self.settings.burn_amount,
            signature
        );

        Ok(signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_RECIPIENT;
    use crate::ports::MockChain;

    fn create_test_settings() -> LifecycleSettings {
        LifecycleSettings {
            decimals: 9,
            airdrop_lamports: 1_000_000_000,
            min_balance_lamports: 1_000_000_000,
            mint_amount: 10_000,
            transfer_amount: 10,
            burn_amount: 10,
            recipient: DEFAULT_RECIPIENT.to_string(),
        }
    }

    fn create_test_lifecycle(
        chain: Arc<MockChain>,
        settings: LifecycleSettings,
    ) -> TokenLifecycle {
        TokenLifecycle::new(chain, WalletManager::new_random(), settings)
    }

    #[tokio::test]
    async fn test_full_run_reports_expected_balances() {
        let chain = Arc::new(MockChain::new());
        let lifecycle = create_test_lifecycle(Arc::clone(&chain), create_test_settings());

        let report = lifecycle.run().await.unwrap();

        assert_eq!(report.initial_balance, 0);
        assert_eq!(report.balance_after_mint, 10_000_000_000_000);
        assert_eq!(report.balance_after_burn, 9_980_000_000_000);
        assert!(matches!(report.funding, FundingOutcome::Airdropped { .. }));
        // Authority is gone after the final step.
        assert_eq!(chain.mint_authority_of(&report.mint), None);
    }

    #[tokio::test]
    async fn test_funding_skipped_when_balance_sufficient() {
        let wallet = WalletManager::new_random();
        let chain = Arc::new(MockChain::new().with_lamports(&wallet.pubkey(), 2_000_000_000));
        let lifecycle =
            TokenLifecycle::new(Arc::clone(&chain) as Arc<dyn ChainPort>, wallet, create_test_settings());

        let report = lifecycle.run().await.unwrap();

        assert!(matches!(
            report.funding,
            FundingOutcome::Skipped { balance: 2_000_000_000 }
        ));
        assert!(!chain.calls().iter().any(|c| c == "request_airdrop"));
    }

    #[tokio::test]
    async fn test_invalid_recipient_fails_before_any_transfer_call() {
        let mut settings = create_test_settings();
        settings.recipient = "not-a-valid-pubkey!".to_string();
        let chain = Arc::new(MockChain::new());
        let lifecycle = create_test_lifecycle(Arc::clone(&chain), settings);

        let err = lifecycle.run().await.unwrap_err();

        assert_eq!(err.step, LifecycleStep::Transfer);
        assert!(matches!(err.source, StepFailure::InvalidRecipient { .. }));

        let calls = chain.calls();
        // Only the wallet's own account was resolved; the recipient's never was.
        assert_eq!(calls.iter().filter(|c| *c == "resolve_token_account").count(), 1);
        assert!(!calls.iter().any(|c| c == "transfer"));
    }

    #[tokio::test]
    async fn test_first_failure_aborts_run() {
        let chain = Arc::new(MockChain::new().fail_on("mint_supply", "faucet is on fire"));
        let lifecycle = create_test_lifecycle(Arc::clone(&chain), create_test_settings());

        let err = lifecycle.run().await.unwrap_err();

        assert_eq!(err.step, LifecycleStep::MintSupply);
        let calls = chain.calls();
        assert!(!calls.iter().any(|c| c == "transfer"));
        assert!(!calls.iter().any(|c| c == "burn"));
        assert!(!calls.iter().any(|c| c == "revoke_mint_authority"));
    }

    #[tokio::test]
    async fn test_mint_overflow_is_caught_before_sending() {
        let mut settings = create_test_settings();
        settings.mint_amount = u64::MAX;
        let chain = Arc::new(MockChain::new());
        let lifecycle = create_test_lifecycle(Arc::clone(&chain), settings);

        let err = lifecycle.run().await.unwrap_err();

        assert_eq!(err.step, LifecycleStep::MintSupply);
        assert!(matches!(err.source, StepFailure::Amount(_)));
        assert!(!chain.calls().iter().any(|c| c == "mint_supply"));
    }

    #[test]
    fn test_step_display_names() {
        assert_eq!(LifecycleStep::Funding.to_string(), "funding");
        assert_eq!(LifecycleStep::CreateMint.to_string(), "create-mint");
        assert_eq!(
            LifecycleStep::RevokeAuthority.to_string(),
            "revoke-mint-authority"
        );
    }

    #[test]
    fn test_error_message_names_the_step() {
        let err = LifecycleError {
            step: LifecycleStep::Burn,
            source: StepFailure::Chain(ChainError::Transaction("insufficient funds".to_string())),
        };
        assert_eq!(
            err.to_string(),
            "step `burn` failed: transaction failed: insufficient funds"
        );
    }
}
