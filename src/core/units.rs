//! Native and reference currency amounts.

use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

/// Smallest native currency unit.
pub type Wei = u128;

// Same 18-digit fixed point as wei: $50 is 50 * 10^18
pub type UsdWad = u128;

pub const DECIMALS: u32 = 18;
pub const WAD: u128 = 1_000_000_000_000_000_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitsError {
    #[error("invalid amount: {0}")]
    Invalid(String),

    #[error("amount must not be negative: {0}")]
    Negative(String),

    #[error("amount has more than 18 decimal places: {0}")]
    TooPrecise(String),

    #[error("amount out of range: {0}")]
    OutOfRange(String),
}

/// Converts a decimal amount of whole units into its 18-digit fixed point form.
pub fn to_wad(amount: Decimal) -> Result<u128, UnitsError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(UnitsError::Negative(amount.to_string()));
    }
    let amount = amount.normalize();
    let scale = amount.scale();
    if scale > DECIMALS {
        return Err(UnitsError::TooPrecise(amount.to_string()));
    }
    let mantissa = amount.mantissa().unsigned_abs();
    10u128
        .checked_pow(DECIMALS - scale)
        .and_then(|factor| mantissa.checked_mul(factor))
        .ok_or_else(|| UnitsError::OutOfRange(amount.to_string()))
}

pub fn from_wad(value: u128) -> Result<Decimal, UnitsError> {
    let mantissa = i128::try_from(value).map_err(|_| UnitsError::OutOfRange(value.to_string()))?;
    Decimal::try_from_i128_with_scale(mantissa, DECIMALS)
        .map(|d| d.normalize())
        .map_err(|_| UnitsError::OutOfRange(value.to_string()))
}

/// Parses a human readable ether amount such as `"0.03"` into wei.
pub fn parse_ether(input: &str) -> Result<Wei, UnitsError> {
    let amount =
        Decimal::from_str(input.trim()).map_err(|_| UnitsError::Invalid(input.to_string()))?;
    to_wad(amount)
}

pub fn format_ether(wei: Wei) -> String {
    match from_wad(wei) {
        Ok(d) => d.to_string(),
        // Too large for a Decimal
        Err(_) => format!("{wei} wei"),
    }
}

pub fn format_usd(value: UsdWad) -> String {
    match from_wad(value) {
        Ok(d) => format!("${:.2}", d.round_dp(2)),
        Err(_) => format!("{value} (usd wad)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ether() {
        assert_eq!(parse_ether("1").unwrap(), WAD);
        assert_eq!(parse_ether("0.03").unwrap(), 30_000_000_000_000_000);
        assert_eq!(parse_ether(" 0.01 ").unwrap(), 10_000_000_000_000_000);
        assert_eq!(parse_ether("0").unwrap(), 0);
        assert_eq!(parse_ether("0.000000000000000001").unwrap(), 1);
    }

    #[test]
    fn test_parse_ether_rejects_bad_input() {
        assert!(matches!(parse_ether("abc"), Err(UnitsError::Invalid(_))));
        assert!(matches!(parse_ether("-1"), Err(UnitsError::Negative(_))));
        assert!(matches!(
            parse_ether("0.0000000000000000001"),
            Err(UnitsError::TooPrecise(_))
        ));
    }

    #[test]
    fn test_format_ether() {
        assert_eq!(format_ether(30_000_000_000_000_000), "0.03");
        assert_eq!(format_ether(5 * WAD), "5");
        assert_eq!(format_ether(0), "0");
        assert_eq!(format_ether(u128::MAX), format!("{} wei", u128::MAX));
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(60 * WAD), "$60.00");
        assert_eq!(format_usd(WAD / 3), "$0.33");
    }
}
