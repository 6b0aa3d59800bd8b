use std::sync::Arc;

use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use thiserror::Error;

/// Environment variable holding the wallet secret key, base58 encoded.
pub const PRIVATE_KEY_ENV: &str = "TOKENSMITH_PRIVATE_KEY";

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("environment variable {0} is not set")]
    MissingKey(String),
    #[error("secret key is not valid base58: {0}")]
    DecodeError(String),
    #[error("invalid keypair bytes: {0}")]
    InvalidKeypair(String),
}

/// Wallet manager holding the signing keypair for every transaction.
///
/// The keypair lives behind an `Arc` so it can be handed to blocking
/// RPC tasks without copying secret key material.
#[derive(Clone)]
pub struct WalletManager {
    keypair: Arc<Keypair>,
}

impl WalletManager {
    /// Load the keypair from the `TOKENSMITH_PRIVATE_KEY` environment
    /// variable. Absence of the variable is fatal for the caller.
    pub fn from_env() -> Result<Self, WalletError> {
        Self::from_env_var(PRIVATE_KEY_ENV)
    }

    /// Load the keypair from a named environment variable.
    pub fn from_env_var(name: &str) -> Result<Self, WalletError> {
        let encoded =
            std::env::var(name).map_err(|_| WalletError::MissingKey(name.to_string()))?;
        Self::from_base58(encoded.trim())
    }

    /// Decode a base58-encoded 64-byte secret key.
    pub fn from_base58(encoded: &str) -> Result<Self, WalletError> {
        let bytes = bs58::decode(encoded)
            .into_vec()
            .map_err(|e| WalletError::DecodeError(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Load keypair from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WalletError> {
        let keypair =
            Keypair::try_from(bytes).map_err(|e| WalletError::InvalidKeypair(e.to_string()))?;

        Ok(Self {
            keypair: Arc::new(keypair),
        })
    }

    /// Create a new random keypair (for testing)
    pub fn new_random() -> Self {
        Self {
            keypair: Arc::new(Keypair::new()),
        }
    }

    /// Get the public key as a string
    pub fn public_key(&self) -> String {
        self.keypair.pubkey().to_string()
    }

    /// Get the public key as Pubkey
    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    /// Shared handle to the signing keypair, for handing to chain calls.
    pub fn signer(&self) -> Arc<Keypair> {
        Arc::clone(&self.keypair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_base58_round_trip() {
        let wallet1 = WalletManager::new_random();
        let encoded = bs58::encode(wallet1.keypair.to_bytes()).into_string();

        let wallet2 = WalletManager::from_base58(&encoded).unwrap();
        assert_eq!(wallet1.public_key(), wallet2.public_key());
    }

    #[test]
    fn test_from_env_var() {
        let wallet1 = WalletManager::new_random();
        let encoded = bs58::encode(wallet1.keypair.to_bytes()).into_string();
        std::env::set_var("TOKENSMITH_TEST_WALLET_KEY", &encoded);

        let wallet2 = WalletManager::from_env_var("TOKENSMITH_TEST_WALLET_KEY").unwrap();
        assert_eq!(wallet1.public_key(), wallet2.public_key());
    }

    #[test]
    fn test_missing_env_var_is_reported_by_name() {
        let result = WalletManager::from_env_var("TOKENSMITH_TEST_UNSET_KEY");
        match result {
            Err(WalletError::MissingKey(name)) => {
                assert_eq!(name, "TOKENSMITH_TEST_UNSET_KEY");
            }
            other => panic!("expected MissingKey, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_invalid_base58() {
        // '0', 'I', 'O' and 'l' are not in the base58 alphabet
        let result = WalletManager::from_base58("0OIl$$not-base58");
        assert!(matches!(result, Err(WalletError::DecodeError(_))));
    }

    #[test]
    fn test_wrong_length_bytes() {
        let encoded = bs58::encode(vec![7u8; 10]).into_string();
        let result = WalletManager::from_base58(&encoded);
        assert!(matches!(result, Err(WalletError::InvalidKeypair(_))));
    }

    #[test]
    fn test_invalid_bytes() {
        let invalid_bytes = vec![0u8; 10]; // Too short
        let result = WalletManager::from_bytes(&invalid_bytes);
        assert!(result.is_err());
    }

    #[test]
    fn test_clone_shares_key() {
        let wallet1 = WalletManager::new_random();
        let wallet2 = wallet1.clone();
        assert_eq!(wallet1.public_key(), wallet2.public_key());
    }

    #[test]
    fn test_pubkey_formats() {
        let wallet = WalletManager::new_random();
        let pubkey_string = wallet.public_key();
        let pubkey_struct = wallet.pubkey();

        assert_eq!(pubkey_string, pubkey_struct.to_string());
    }
}
