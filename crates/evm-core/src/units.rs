use alloy_primitives::U256;

use crate::error::EvmError;

/// Number of decimal places between ETH and its base unit.
pub const ETH_DECIMALS: usize = 18;

fn wei_per_eth() -> U256 {
    U256::from(1_000_000_000_000_000_000u64)
}

/// Converts a decimal ETH amount to integer base units (wei).
///
/// The conversion is exact: the string is split into integer and
/// fractional digits and combined with checked `U256` arithmetic. No
/// floating-point representation is involved at any step, so amounts at
/// the precision boundary survive untouched.
///
/// Accepts `"1"`, `"0.5"`, `".5"` and `"1."`. Rejects input with no
/// digits, non-digit characters, more than 18 fractional digits, or a
/// value that overflows `U256`.
pub fn parse_eth(amount: &str) -> Result<U256, EvmError> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(EvmError::InvalidAmount("amount is empty".into()));
    }

    let (int_part, frac_part) = match trimmed.split_once('.') {
        Some((i, f)) => (i, f),
        None => (trimmed, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(EvmError::InvalidAmount("amount has no digits".into()));
    }
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(EvmError::InvalidAmount(format!(
            "{trimmed} is not a decimal number"
        )));
    }
    if frac_part.len() > ETH_DECIMALS {
        return Err(EvmError::InvalidAmount(format!(
            "more than {ETH_DECIMALS} decimal places"
        )));
    }

    let whole = if int_part.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(int_part, 10)
            .map_err(|_| EvmError::InvalidAmount("integer part overflows uint256".into()))?
    };

    // Scale the fractional digits up to 18 places: "5" -> 5 * 10^17.
    let frac = if frac_part.is_empty() {
        U256::ZERO
    } else {
        let digits = U256::from_str_radix(frac_part, 10)
            .map_err(|_| EvmError::InvalidAmount("fractional part is not numeric".into()))?;
        let scale = U256::from(10u64).pow(U256::from((ETH_DECIMALS - frac_part.len()) as u64));
        digits * scale
    };

    whole
        .checked_mul(wei_per_eth())
        .and_then(|w| w.checked_add(frac))
        .ok_or_else(|| EvmError::InvalidAmount("amount overflows uint256".into()))
}

/// Renders a wei amount as a decimal ETH string, trimming trailing
/// fractional zeros.
pub fn format_wei(wei: U256) -> String {
    let whole = wei / wei_per_eth();
    let frac = wei % wei_per_eth();

    if frac.is_zero() {
        return whole.to_string();
    }

    let mut frac_str = format!("{frac:0>width$}", width = ETH_DECIMALS);
    while frac_str.ends_with('0') {
        frac_str.pop();
    }

    format!("{whole}.{frac_str}")
}
