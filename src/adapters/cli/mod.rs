//! CLI Adapter
//!
//! Command-line interface for the tokensmith binary.
//! Uses clap derive macros for argument parsing.

mod commands;

pub use commands::{CliApp, Command, RunCmd, StatusCmd};
