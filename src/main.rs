//! Tokensmith - SPL Token Lifecycle Runner
//!
//! Funds a devnet wallet, creates a fresh SPL token mint, mints supply,
//! transfers and burns a slice of it, and revokes the mint authority.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use tokensmith::adapters::cli::{CliApp, Command, RunCmd, StatusCmd};
use tokensmith::adapters::solana::{SolanaChain, SolanaClient, WalletManager, PRIVATE_KEY_ENV};
use tokensmith::application::{FundingOutcome, LifecycleSettings, TokenLifecycle};
use tokensmith::config::load_config;
use tokensmith::domain::amount::format_tokens;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (the wallet secret goes here, not in the TOML)
    dotenvy::dotenv().ok();

    let app = CliApp::parse();
    init_logging(app.verbose, app.debug)?;

    match app.command {
        Command::Run(cmd) => run_command(cmd).await,
        Command::Status(cmd) => status_command(cmd).await,
    }
}

fn init_logging(verbose: bool, debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    fmt().with_env_filter(filter).with_target(false).init();
    Ok(())
}

async fn run_command(cmd: RunCmd) -> Result<()> {
    tracing::info!("Starting tokensmith...");

    // Load config
    let config = load_config(&cmd.config).context("Failed to load configuration")?;

    // Wallet is required before anything touches the network
    let wallet = load_wallet_with_context()?;

    // CLI flag beats the SOLANA_RPC_URL override, which beats the config file
    let rpc_url = cmd
        .rpc_url
        .unwrap_or_else(|| config.solana.get_rpc_url());
    let solana = SolanaClient::new(rpc_url, config.solana.commitment_config());
    let chain = Arc::new(SolanaChain::new(solana));

    let settings = LifecycleSettings::from(&config);
    let decimals = settings.decimals;

    println!("Wallet: {}", wallet.public_key());

    let lifecycle = TokenLifecycle::new(chain, wallet, settings);
    let report = lifecycle.run().await.context("Token lifecycle aborted")?;

    match report.funding {
        FundingOutcome::Skipped { balance } => {
            println!("Funding: skipped, wallet holds {} lamports", balance);
        }
        FundingOutcome::Airdropped {
            signature,
            balance_after,
        } => {
            println!(
                "Funding: airdrop confirmed, balance {} lamports (tx {})",
                balance_after, signature
            );
        }
    }
    println!("Token address: {}", report.mint);
    println!("Token account address: {}", report.token_account);
    println!("Initial balance: {}", report.initial_balance);
    println!(
        "Balance after mint: {} ({} tokens)",
        report.balance_after_mint,
        format_tokens(report.balance_after_mint, decimals)
    );
    println!("Transfer signature: {}", report.transfer_signature);
    println!(
        "Balance after burn: {} ({} tokens)",
        report.balance_after_burn,
        format_tokens(report.balance_after_burn, decimals)
    );
    println!("Minting disabled: supply is fixed");
    println!("Done!");

    Ok(())
}

async fn status_command(cmd: StatusCmd) -> Result<()> {
    let config = load_config(&cmd.config)?;
    let solana = SolanaClient::new(
        config.solana.get_rpc_url(),
        config.solana.commitment_config(),
    );
    let wallet = load_wallet_with_context()?;

    let balance = solana
        .get_balance(&wallet.pubkey())
        .await
        .context("Failed to get balance")?;

    println!("Wallet: {}", wallet.public_key());
    println!(
        "Balance: {} lamports ({:.4} SOL)",
        balance,
        balance as f64 / 1e9
    );
    if balance < config.funding.min_balance_lamports {
        println!(
            "Below the {} lamport threshold: the next run will request an airdrop of {} lamports",
            config.funding.min_balance_lamports, config.funding.airdrop_lamports
        );
    }

    Ok(())
}

/// Load the wallet with helpful error messages
fn load_wallet_with_context() -> Result<WalletManager> {
    WalletManager::from_env().map_err(|e| {
        anyhow::anyhow!(
            "Failed to load wallet: {}\n\n\
             Set {} to the base58-encoded 64-byte secret key of a devnet wallet\n\
             (the format wallet apps export), either in the environment or in a\n\
             .env file next to the binary.\n\n\
             Never use a mainnet key here.",
            e,
            PRIVATE_KEY_ENV
        )
    })
}
