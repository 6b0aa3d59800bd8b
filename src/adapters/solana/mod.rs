pub mod chain;
pub mod rpc;
pub mod token;
pub mod wallet;

pub use chain::SolanaChain;
pub use rpc::SolanaClient;
pub use token::TokenClient;
pub use wallet::{WalletManager, PRIVATE_KEY_ENV};
