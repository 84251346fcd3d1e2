//! Native to USD price conversion.

use crate::core::units::{DECIMALS, UsdWad, WAD, Wei};

fn normalize_price(price: u128, decimals: u8) -> Option<u128> {
    // Rescale to 18 digits, flooring when the feed is more precise
    let decimals = u32::from(decimals);
    if decimals <= DECIMALS {
        price.checked_mul(10u128.checked_pow(DECIMALS - decimals)?)
    } else {
        Some(price / 10u128.checked_pow(decimals - DECIMALS)?)
    }
}

/// Computes `floor(a * b / 10^18)` without a 256-bit intermediate.
fn mul_wad(a: u128, b: u128) -> Option<u128> {
    // Split into 10^18 limbs; each partial product fits in u128
    let (a_hi, a_lo) = (a / WAD, a % WAD);
    let (b_hi, b_lo) = (b / WAD, b % WAD);

    let high = a_hi.checked_mul(b_hi)?.checked_mul(WAD)?;
    let cross = a_hi.checked_mul(b_lo)?.checked_add(a_lo.checked_mul(b_hi)?)?;
    let low = a_lo * b_lo / WAD;

    high.checked_add(cross)?.checked_add(low)
}

/// Converts `native_amount` wei into USD at `price` (with `decimals` digits).
/// `None` on overflow.
pub fn convert_to_usd(native_amount: Wei, price: u128, decimals: u8) -> Option<UsdWad> {
    if native_amount == 0 {
        return Some(0);
    }
    mul_wad(normalize_price(price, decimals)?, native_amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::units::parse_ether;

    const PRICE_2000_8DEC: u128 = 200_000_000_000;

    #[test]
    fn test_zero_amount_is_zero() {
        assert_eq!(convert_to_usd(0, PRICE_2000_8DEC, 8), Some(0));
        assert_eq!(convert_to_usd(0, u128::MAX, 0), Some(0));
    }

    #[test]
    fn test_convert_eth_at_2000() {
        let usd = convert_to_usd(parse_ether("0.03").unwrap(), PRICE_2000_8DEC, 8).unwrap();
        assert_eq!(usd, 60 * WAD);

        let usd = convert_to_usd(parse_ether("0.01").unwrap(), PRICE_2000_8DEC, 8).unwrap();
        assert_eq!(usd, 20 * WAD);

        let usd = convert_to_usd(WAD, PRICE_2000_8DEC, 8).unwrap();
        assert_eq!(usd, 2000 * WAD);
    }

    #[test]
    fn test_convert_matches_across_decimal_bases() {
        let amount = parse_ether("1.5").unwrap();
        let with_8 = convert_to_usd(amount, 2_000_00000000, 8).unwrap();
        let with_18 = convert_to_usd(amount, 2000 * WAD, 18).unwrap();
        let with_0 = convert_to_usd(amount, 2000, 0).unwrap();
        assert_eq!(with_8, 3000 * WAD);
        assert_eq!(with_8, with_18);
        assert_eq!(with_8, with_0);
    }

    #[test]
    fn test_convert_with_more_than_18_decimals_truncates() {
        // $1.5 quoted with 20 decimals loses the last two digits.
        let price = 150_000_000_000_000_000_099;
        assert_eq!(convert_to_usd(WAD, price, 20).unwrap(), 1_500_000_000_000_000_000);
    }

    #[test]
    fn test_convert_large_amounts_without_intermediate_overflow() {
        // 10^9 native units at $100k: the naive product is ~10^50.
        let amount = 1_000_000_000 * WAD;
        let price = 100_000 * 100_000_000;
        let usd = convert_to_usd(amount, price, 8).unwrap();
        assert_eq!(usd, 100_000_000_000_000 * WAD);
    }

    #[test]
    fn test_convert_overflow_is_none() {
        assert_eq!(convert_to_usd(u128::MAX, u128::MAX, 8), None);
        assert_eq!(convert_to_usd(WAD, 1, 60), None);
    }

    #[test]
    fn test_mul_wad_is_exact_floor() {
        assert_eq!(mul_wad(3, WAD / 2), Some(1));
        assert_eq!(mul_wad(WAD + 1, WAD + 1), Some(WAD + 2));
        assert_eq!(mul_wad(7 * WAD + 123, 11), Some(77));
    }
}
