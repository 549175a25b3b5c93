//! Conversion between decimal token amounts and integer base units.

use alloy_primitives::U256;

use crate::error::EthError;

/// Decimals of ether (1 ETH = 10^18 wei).
pub const ETHER_DECIMALS: u8 = 18;

/// Largest `decimals` whose scale factor still fits in a `U256`.
const MAX_DECIMALS: u8 = 77;

fn scale(decimals: u8) -> Result<U256, EthError> {
    if decimals > MAX_DECIMALS {
        return Err(EthError::ValueTooLarge(format!(
            "{decimals} decimals exceeds the 256-bit range"
        )));
    }
    Ok(U256::from(10u64).pow(U256::from(decimals)))
}

fn parse_digits(digits: &str, original: &str) -> Result<U256, EthError> {
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EthError::InvalidAmount(original.to_string()));
    }
    U256::from_str_radix(digits, 10)
        .map_err(|_| EthError::ValueTooLarge(original.to_string()))
}

/// Parses a decimal amount such as `"1.5"` into base units with the given
/// number of decimals.
///
/// A leading `-` is rejected with [`EthError::NegativeValue`], more fractional
/// digits than `decimals` with [`EthError::ValueTooLarge`].
pub fn parse_units(text: &str, decimals: u8) -> Result<U256, EthError> {
    let trimmed = text.trim();
    if trimmed.starts_with('-') {
        return Err(EthError::NegativeValue(trimmed.to_string()));
    }
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);

    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, f),
        None => (unsigned, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(EthError::InvalidAmount(text.to_string()));
    }
    if frac_part.len() > usize::from(decimals) {
        return Err(EthError::ValueTooLarge(format!(
            "{trimmed} has more than {decimals} fractional digits"
        )));
    }

    let unit = scale(decimals)?;
    let whole = parse_digits(int_part, trimmed)?;
    let frac = parse_digits(frac_part, trimmed)?;
    // "0.5" with 18 decimals is 5 * 10^17
    let frac_scale = scale(decimals - frac_part.len() as u8)?;

    whole
        .checked_mul(unit)
        .and_then(|w| frac.checked_mul(frac_scale).and_then(|f| w.checked_add(f)))
        .ok_or_else(|| EthError::ValueTooLarge(trimmed.to_string()))
}

/// Formats base units as a decimal amount, trimming trailing fractional zeros.
pub fn format_units(amount: U256, decimals: u8) -> String {
    if decimals == 0 {
        return amount.to_string();
    }
    let digits = amount.to_string();
    let width = usize::from(decimals);
    let padded = if digits.len() <= width {
        format!("{}{digits}", "0".repeat(width + 1 - digits.len()))
    } else {
        digits
    };
    let (whole, frac) = padded.split_at(padded.len() - width);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{frac}")
    }
}

/// Parses an ether amount into wei.
pub fn parse_ether(text: &str) -> Result<U256, EthError> {
    parse_units(text, ETHER_DECIMALS)
}

/// Formats wei as ether.
pub fn format_ether(wei: U256) -> String {
    format_units(wei, ETHER_DECIMALS)
}
