//! Configuration Loader
//!
//! Loads and validates configuration from TOML files matching config/devnet.toml
//! structure. Every lifecycle literal (amounts, decimals, recipient) has a
//! named default so a minimal file with just an RPC URL is enough.

use serde::Deserialize;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::native_token::LAMPORTS_PER_SOL;
use std::path::Path;
use thiserror::Error;

use crate::domain::amount::MAX_DECIMALS;

/// Commitment level used when the config does not name one.
pub const DEFAULT_COMMITMENT: &str = "confirmed";
/// Lamports requested from the faucet when the wallet needs funding.
pub const DEFAULT_AIRDROP_LAMPORTS: u64 = LAMPORTS_PER_SOL;
/// Wallet balance below which an airdrop is requested.
pub const DEFAULT_MIN_BALANCE_LAMPORTS: u64 = LAMPORTS_PER_SOL;
/// Decimal places of the created mint.
pub const DEFAULT_DECIMALS: u8 = 9;
/// Whole tokens minted into the wallet's account.
pub const DEFAULT_MINT_AMOUNT: u64 = 10_000;
/// Whole tokens sent to the recipient.
pub const DEFAULT_TRANSFER_AMOUNT: u64 = 10;
/// Whole tokens burned out of the wallet's account.
pub const DEFAULT_BURN_AMOUNT: u64 = 10;
/// Devnet wallet receiving the transfer.
pub const DEFAULT_RECIPIENT: &str = "6Sz1Ddx5dxQZ2HRgyWJkhCZxakZENn5KFy8J1Skxm1cx";

/// Main configuration structure matching config/devnet.toml
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub solana: SolanaSection,
    #[serde(default)]
    pub funding: FundingSection,
    #[serde(default)]
    pub token: TokenSection,
}

/// Solana RPC configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct SolanaSection {
    /// RPC endpoint (devnet by default; the faucet only exists on test networks)
    pub rpc_url: String,
    /// Commitment level: "processed", "confirmed", "finalized"
    #[serde(default = "default_commitment")]
    pub commitment: String,
}

impl SolanaSection {
    /// Get RPC URL with environment variable override
    /// Checks SOLANA_RPC_URL env var first, falls back to config value
    pub fn get_rpc_url(&self) -> String {
        std::env::var("SOLANA_RPC_URL").unwrap_or_else(|_| self.rpc_url.clone())
    }

    /// Commitment as the SDK type. `validate` guarantees the string is one
    /// of the known levels before this is called.
    pub fn commitment_config(&self) -> CommitmentConfig {
        match self.commitment.as_str() {
            "processed" => CommitmentConfig::processed(),
            "finalized" => CommitmentConfig::finalized(),
            _ => CommitmentConfig::confirmed(),
        }
    }
}

/// Wallet funding configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct FundingSection {
    /// Lamports to request from the faucet
    #[serde(default = "default_airdrop_lamports")]
    pub airdrop_lamports: u64,
    /// Airdrop only when the wallet balance is below this
    #[serde(default = "default_min_balance_lamports")]
    pub min_balance_lamports: u64,
}

impl Default for FundingSection {
    fn default() -> Self {
        Self {
            airdrop_lamports: DEFAULT_AIRDROP_LAMPORTS,
            min_balance_lamports: DEFAULT_MIN_BALANCE_LAMPORTS,
        }
    }
}

/// Token lifecycle configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct TokenSection {
    /// Decimal places of the new mint
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    /// Whole tokens to mint
    #[serde(default = "default_mint_amount")]
    pub mint_amount: u64,
    /// Whole tokens to transfer to the recipient
    #[serde(default = "default_transfer_amount")]
    pub transfer_amount: u64,
    /// Whole tokens to burn
    #[serde(default = "default_burn_amount")]
    pub burn_amount: u64,
    /// Base58 wallet address receiving the transfer
    #[serde(default = "default_recipient")]
    pub recipient: String,
}

impl Default for TokenSection {
    fn default() -> Self {
        Self {
            decimals: DEFAULT_DECIMALS,
            mint_amount: DEFAULT_MINT_AMOUNT,
            transfer_amount: DEFAULT_TRANSFER_AMOUNT,
            burn_amount: DEFAULT_BURN_AMOUNT,
            recipient: DEFAULT_RECIPIENT.to_string(),
        }
    }
}

fn default_commitment() -> String {
    DEFAULT_COMMITMENT.to_string()
}

fn default_airdrop_lamports() -> u64 {
    DEFAULT_AIRDROP_LAMPORTS
}

fn default_min_balance_lamports() -> u64 {
    DEFAULT_MIN_BALANCE_LAMPORTS
}

fn default_decimals() -> u8 {
    DEFAULT_DECIMALS
}

fn default_mint_amount() -> u64 {
    DEFAULT_MINT_AMOUNT
}

fn default_transfer_amount() -> u64 {
    DEFAULT_TRANSFER_AMOUNT
}

fn default_burn_amount() -> u64 {
    DEFAULT_BURN_AMOUNT
}

fn default_recipient() -> String {
    DEFAULT_RECIPIENT.to_string()
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.solana.rpc_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "rpc_url cannot be empty".to_string(),
            ));
        }

        match self.solana.commitment.as_str() {
            "processed" | "confirmed" | "finalized" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "commitment must be processed, confirmed or finalized, got {}",
                    other
                )));
            }
        }

        if self.token.decimals > MAX_DECIMALS {
            return Err(ConfigError::ValidationError(format!(
                "decimals must be <= {}, got {}",
                MAX_DECIMALS, self.token.decimals
            )));
        }

        if self.token.recipient.is_empty() {
            return Err(ConfigError::ValidationError(
                "recipient cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

// Conversion from Config to LifecycleSettings
impl From<&Config> for crate::application::LifecycleSettings {
    fn from(config: &Config) -> Self {
        crate::application::LifecycleSettings {
            decimals: config.token.decimals,
            airdrop_lamports: config.funding.airdrop_lamports,
            min_balance_lamports: config.funding.min_balance_lamports,
            mint_amount: config.token.mint_amount,
            transfer_amount: config.token.transfer_amount,
            burn_amount: config.token.burn_amount,
            recipient: config.token.recipient.clone(),
        }
    }
}
