use std::sync::Arc;
use std::time::Duration;

use solana_client::client_error::{ClientError, ClientErrorKind};
use solana_client::rpc_client::RpcClient;
use solana_client::rpc_request::RpcError;
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey, signature::Signature};

use crate::ports::ChainError;

/// How often the confirmation loop re-checks a pending signature.
const CONFIRMATION_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// JSON-RPC invalid-params code. The node answers balance queries against
/// unknown accounts with this response rather than a dedicated error.
const RPC_INVALID_PARAMS: i64 = -32602;

fn classify_token_balance_error(error: ClientError, account: Pubkey) -> ChainError {
    match error.kind() {
        ClientErrorKind::RpcError(RpcError::RpcResponseError {
            code: RPC_INVALID_PARAMS,
            ..
        }) => ChainError::AccountNotFound(account),
        _ => ChainError::Rpc(error.to_string()),
    }
}

/// Wrapper around the Solana RPC client with async-compatible methods.
///
/// The underlying client is synchronous, so every call is moved onto the
/// blocking thread pool.
#[derive(Clone)]
pub struct SolanaClient {
    client: Arc<RpcClient>,
    commitment: CommitmentConfig,
}

impl SolanaClient {
    /// Create a new Solana RPC client pinned to a commitment level.
    pub fn new(rpc_url: String, commitment: CommitmentConfig) -> Self {
        let client = Arc::new(RpcClient::new_with_commitment(rpc_url, commitment));
        Self { client, commitment }
    }

    /// Shared handle to the raw client, for sibling adapters.
    pub(crate) fn rpc(&self) -> Arc<RpcClient> {
        Arc::clone(&self.client)
    }

    /// Commitment level this client was configured with.
    pub fn commitment(&self) -> CommitmentConfig {
        self.commitment
    }

    /// Get SOL balance in lamports for a public key
    pub async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64, ChainError> {
        let pubkey = *pubkey;

        // Spawn blocking to make sync RPC call async-compatible
        let client = Arc::clone(&self.client);
        tokio::task::spawn_blocking(move || {
            client
                .get_balance(&pubkey)
                .map_err(|e| ChainError::Rpc(e.to_string()))
        })
        .await
        .map_err(|e| ChainError::Rpc(format!("Task join error: {}", e)))?
    }

    /// Request a faucet airdrop; the returned signature is not yet confirmed.
    pub async fn request_airdrop(
        &self,
        pubkey: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, ChainError> {
        let pubkey = *pubkey;

        let client = Arc::clone(&self.client);
        tokio::task::spawn_blocking(move || {
            client
                .request_airdrop(&pubkey, lamports)
                .map_err(|e| ChainError::Rpc(e.to_string()))
        })
        .await
        .map_err(|e| ChainError::Rpc(format!("Task join error: {}", e)))?
    }

    /// Poll until `signature` is confirmed at the configured commitment.
    ///
    /// The wait is bounded by the validity window of a fresh blockhash:
    /// once the chain's block height passes the hash's last valid height,
    /// the signature can no longer land and the wait fails.
    pub async fn wait_for_confirmation(&self, signature: &Signature) -> Result<(), ChainError> {
        let signature = *signature;
        let commitment = self.commitment;

        let client = Arc::clone(&self.client);
        tokio::task::spawn_blocking(move || {
            let (_blockhash, last_valid_block_height) = client
                .get_latest_blockhash_with_commitment(commitment)
                .map_err(|e| ChainError::Rpc(e.to_string()))?;

            loop {
                let confirmed = client
                    .confirm_transaction_with_commitment(&signature, commitment)
                    .map_err(|e| ChainError::Rpc(e.to_string()))?
                    .value;
                if confirmed {
                    return Ok(());
                }

                let block_height = client
                    .get_block_height()
                    .map_err(|e| ChainError::Rpc(e.to_string()))?;
                if block_height > last_valid_block_height {
                    return Err(ChainError::ConfirmationExpired {
                        signature,
                        ceiling: last_valid_block_height,
                    });
                }

                std::thread::sleep(CONFIRMATION_POLL_INTERVAL);
            }
        })
        .await
        .map_err(|e| ChainError::Rpc(format!("Task join error: {}", e)))?
    }

    /// Get SPL token account balance in base units
    pub async fn get_token_account_balance(&self, pubkey: &Pubkey) -> Result<u64, ChainError> {
        let pubkey = *pubkey;

        let client = Arc::clone(&self.client);
        tokio::task::spawn_blocking(move || {
            client
                .get_token_account_balance(&pubkey)
                .map_err(|e| classify_token_balance_error(e, pubkey))
                .and_then(|balance| {
                    balance
                        .amount
                        .parse::<u64>()
                        .map_err(|e| ChainError::Rpc(format!("Parse error: {}", e)))
                })
        })
        .await
        .map_err(|e| ChainError::Rpc(format!("Task join error: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_creation() {
        let client = SolanaClient::new(
            "https://api.devnet.solana.com".to_string(),
            CommitmentConfig::confirmed(),
        );
        assert_eq!(client.commitment(), CommitmentConfig::confirmed());
    }

    #[test]
    fn test_invalid_params_response_maps_to_account_not_found() {
        use solana_client::rpc_request::RpcResponseErrorData;

        let account = Pubkey::new_unique();
        let error = ClientError::from(RpcError::RpcResponseError {
            code: RPC_INVALID_PARAMS,
            message: "Invalid param: could not find account".to_string(),
            data: RpcResponseErrorData::Empty,
        });

        assert!(matches!(
            classify_token_balance_error(error, account),
            ChainError::AccountNotFound(a) if a == account
        ));
    }

    #[test]
    fn test_other_rpc_errors_are_not_misread_as_missing_accounts() {
        let account = Pubkey::new_unique();

        let error = ClientError::from(RpcError::ForUser("connection refused".to_string()));
        assert!(matches!(
            classify_token_balance_error(error, account),
            ChainError::Rpc(_)
        ));

        use solana_client::rpc_request::RpcResponseErrorData;
        let error = ClientError::from(RpcError::RpcResponseError {
            code: -32002,
            message: "Transaction simulation failed".to_string(),
            data: RpcResponseErrorData::Empty,
        });
        assert!(matches!(
            classify_token_balance_error(error, account),
            ChainError::Rpc(_)
        ));
    }

    #[test]
    fn test_clone_shares_client() {
        let client = SolanaClient::new(
            "https://api.devnet.solana.com".to_string(),
            CommitmentConfig::confirmed(),
        );
        let cloned = client.clone();
        assert!(Arc::ptr_eq(&client.rpc(), &cloned.rpc()));
    }
}
