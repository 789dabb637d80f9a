//! Output rounding of monetary figures

use bigdecimal::{BigDecimal, RoundingMode};

/// Number of decimals figures are rounded to unless configured otherwise
pub const DEFAULT_DECIMALS: u32 = 4;

/// Round an amount to `decimals` places, halves away from zero
pub fn round_amount(amount: &BigDecimal, decimals: u32) -> BigDecimal {
    amount.with_scale_round(i64::from(decimals), RoundingMode::HalfUp)
}

/// Render an amount with exactly `decimals` places
pub fn format_amount(amount: &BigDecimal, decimals: u32) -> String {
    format!("{:.*}", decimals as usize, round_amount(amount, decimals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_amount(&dec("0.00005"), 4), dec("0.0001"));
        assert_eq!(round_amount(&dec("-0.00005"), 4), dec("-0.0001"));
        assert_eq!(round_amount(&dec("1.23444"), 4), dec("1.2344"));
        assert_eq!(round_amount(&dec("2.5"), 0), dec("3"));
    }

    #[test]
    fn test_format_pads_to_scale() {
        assert_eq!(format_amount(&dec("70"), 4), "70.0000");
        assert_eq!(format_amount(&dec("-12.3"), 2), "-12.30");
    }
}
