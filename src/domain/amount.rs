//! Token Amount Scaling
//!
//! Converts whole-token counts to base units (smallest denomination) using
//! exact checked integer arithmetic. A mint with 9 decimals stores balances
//! scaled by 10^9; nothing here rounds.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount {tokens} with {decimals} decimals overflows u64")]
    Overflow { tokens: u64, decimals: u8 },
    #[error("unsupported decimal precision {0} (max {MAX_DECIMALS})")]
    UnsupportedDecimals(u8),
}

/// Highest decimal precision this tool accepts. 10^19 overflows u64, and the
/// SPL convention tops out at 9 anyway.
pub const MAX_DECIMALS: u8 = 9;

/// Convert a whole-token count to base units (`tokens * 10^decimals`).
pub fn base_units(tokens: u64, decimals: u8) -> Result<u64, AmountError> {
    let scale = unit_scale(decimals)?;
    tokens
        .checked_mul(scale)
        .ok_or(AmountError::Overflow { tokens, decimals })
}

/// The base-unit scale for a given precision (`10^decimals`).
pub fn unit_scale(decimals: u8) -> Result<u64, AmountError> {
    if decimals > MAX_DECIMALS {
        return Err(AmountError::UnsupportedDecimals(decimals));
    }
    Ok(10u64.pow(decimals as u32))
}

/// Render a raw base-unit balance as a whole-token string for display,
/// trimming the fractional part when it is zero.
pub fn format_tokens(base: u64, decimals: u8) -> String {
    let scale = match unit_scale(decimals) {
        Ok(s) => s,
        Err(_) => return base.to_string(),
    };
    let whole = base / scale;
    let frac = base % scale;
    if frac == 0 {
        whole.to_string()
    } else {
        let digits = format!("{:0width$}", frac, width = decimals as usize);
        format!("{}.{}", whole, digits.trim_end_matches('0'))
    }
}
