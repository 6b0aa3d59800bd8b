//! Domain Layer - Pure token arithmetic
//!
//! This module contains logic with no external dependencies. Network
//! interactions happen through the ports layer.

pub mod amount;

pub use amount::{base_units, format_tokens, unit_scale, AmountError, MAX_DECIMALS};
