//! CLI Command Definitions
//!
//! Argument parsing for the tokensmith binary. Command handlers live in
//! `main.rs`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tokensmith - SPL token lifecycle runner for Solana devnet
#[derive(Parser, Debug)]
#[command(
    name = "tokensmith",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "SPL token lifecycle runner for Solana devnet",
    long_about = "Tokensmith funds a devnet wallet, creates a fresh SPL token mint, mints \
                  supply, transfers and burns a slice of it, and finally revokes the mint \
                  authority so the supply is fixed."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the full token lifecycle
    Run(RunCmd),

    /// Show wallet address and SOL balance
    Status(StatusCmd),
}

/// Run the full token lifecycle
#[derive(Parser, Debug)]
pub struct RunCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/devnet.toml")]
    pub config: PathBuf,

    /// Override RPC URL
    #[arg(long, value_name = "URL")]
    pub rpc_url: Option<String>,
}

/// Show wallet status
#[derive(Parser, Debug)]
pub struct StatusCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/devnet.toml")]
    pub config: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_app_parse_run() {
        let args = vec!["tokensmith", "run", "--config", "test.toml"];
        let app = CliApp::try_parse_from(args).unwrap();

        match app.command {
            Command::Run(cmd) => {
                assert_eq!(cmd.config, PathBuf::from("test.toml"));
                assert_eq!(cmd.rpc_url, None);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_default_config_path() {
        let args = vec!["tokensmith", "run"];
        let app = CliApp::try_parse_from(args).unwrap();

        match app.command {
            Command::Run(cmd) => {
                assert_eq!(cmd.config, PathBuf::from("config/devnet.toml"));
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_app_parse_run_with_rpc_override() {
        let args = vec![
            "tokensmith",
            "run",
            "--rpc-url",
            "http://localhost:8899",
        ];
        let app = CliApp::try_parse_from(args).unwrap();

        match app.command {
            Command::Run(cmd) => {
                assert_eq!(cmd.rpc_url, Some("http://localhost:8899".to_string()));
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_app_parse_status() {
        let args = vec!["tokensmith", "status"];
        let app = CliApp::try_parse_from(args).unwrap();

        match app.command {
            Command::Status(cmd) => {
                assert_eq!(cmd.config, PathBuf::from("config/devnet.toml"));
            }
            _ => panic!("Expected Status command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let args = vec!["tokensmith", "-v", "--debug", "status"];
        let app = CliApp::try_parse_from(args).unwrap();

        assert!(app.verbose);
        assert!(app.debug);
    }
}
