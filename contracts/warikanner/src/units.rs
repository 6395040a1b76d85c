//! Conversion between minimal-unit integers and decimal strings.

use thiserror::Error;

pub const ETHER_DECIMALS: u8 = 18;
pub const YOCTO_NEAR_DECIMALS: u8 = 24;
pub const DEFAULT_DISPLAY_PLACES: usize = 4;

/// 1,000,000 ETH in wei; upper bound accepted by [`validate_eth_amount`].
pub const MAX_ETH_AMOUNT_WEI: u128 = 1_000_000 * 1_000_000_000_000_000_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitsError {
    #[error("Invalid decimal number: {0:?}")]
    InvalidNumber(String),

    #[error("Too many decimal places, at most {0} allowed")]
    TooManyDecimals(u8),

    #[error("Amount overflows 128 bits")]
    Overflow,
}

/// Renders `value` minimal units as a decimal with `decimals` fractional
/// digits, trimming trailing zeros but keeping at least one.
pub fn format_units(value: u128, decimals: u8) -> String {
    let decimals = decimals as usize;
    let padded = format!("{value:0>width$}", width = decimals + 1);
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    let fraction = if fraction.is_empty() { "0" } else { fraction };
    format!("{whole}.{fraction}")
}

pub fn parse_units(text: &str, decimals: u8) -> Result<u128, UnitsError> {
    let text = text.trim();
    let invalid = || UnitsError::InvalidNumber(text.to_string());

    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(whole) || !is_digits(fraction) {
        return Err(invalid());
    }

    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > decimals as usize {
        return Err(UnitsError::TooManyDecimals(decimals));
    }

    let scale = 10u128
        .checked_pow(decimals as u32)
        .ok_or(UnitsError::Overflow)?;
    let whole_value = if whole.is_empty() {
        0
    } else {
        whole.parse::<u128>().map_err(|_| UnitsError::Overflow)?
    };
    let fraction_value = if fraction.is_empty() {
        0
    } else {
        let digits = fraction.parse::<u128>().map_err(|_| UnitsError::Overflow)?;
        // fraction.len() <= decimals, so the factor is at most `scale`
        digits * 10u128.pow(decimals as u32 - fraction.len() as u32)
    };

    whole_value
        .checked_mul(scale)
        .and_then(|v| v.checked_add(fraction_value))
        .ok_or(UnitsError::Overflow)
}

pub fn format_ether(wei: u128) -> String {
    format_units(wei, ETHER_DECIMALS)
}

pub fn parse_ether(text: &str) -> Result<u128, UnitsError> {
    parse_units(text, ETHER_DECIMALS)
}

/// Renders `value` with exactly `places` fractional digits, rounding half up.
pub fn format_fixed(value: u128, decimals: u8, places: usize) -> String {
    let decimals_usize = decimals as usize;
    if places >= decimals_usize {
        let padded = format!("{value:0>width$}", width = decimals_usize + 1);
        let (whole, fraction) = padded.split_at(padded.len() - decimals_usize);
        if places == 0 {
            return whole.to_string();
        }
        return format!("{whole}.{fraction:0<places$}");
    }

    let rounded = match 10u128.checked_pow((decimals_usize - places) as u32) {
        Some(divisor) => {
            let quotient = value / divisor;
            let remainder = value % divisor;
            if remainder * 2 >= divisor {
                quotient + 1
            } else {
                quotient
            }
        }
        // divisor beyond u128: every value rounds to zero
        None => 0,
    };

    if places == 0 {
        return rounded.to_string();
    }
    let padded = format!("{rounded:0>width$}", width = places + 1);
    let (whole, fraction) = padded.split_at(padded.len() - places);
    format!("{whole}.{fraction}")
}

pub fn format_eth(wei: u128, places: usize) -> String {
    format!("{} ETH", format_fixed(wei, ETHER_DECIMALS, places))
}

/// Accepts a positive ETH amount no larger than 1,000,000 ETH.
pub fn validate_eth_amount(text: &str) -> bool {
    parse_ether(text)
        .map(|wei| wei > 0 && wei <= MAX_ETH_AMOUNT_WEI)
        .unwrap_or(false)
}
