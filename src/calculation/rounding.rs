//! Currency rounding.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to cents, halves away from zero.
///
/// Calculations keep full precision and round only when building the result.
///
/// # Examples
///
/// ```
/// use tax_engine::calculation::round_currency;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_currency(Decimal::from_str("953.74125").unwrap()), Decimal::from_str("953.74").unwrap());
/// assert_eq!(round_currency(Decimal::from_str("0.125").unwrap()), Decimal::from_str("0.13").unwrap());
/// ```
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_half_rounds_away_from_zero() {
        assert_eq!(round_currency(dec("2.345")), dec("2.35"));
        assert_eq!(round_currency(dec("-2.345")), dec("-2.35"));
    }

    #[test]
    fn test_already_rounded_is_unchanged() {
        assert_eq!(round_currency(dec("4016")), dec("4016"));
        assert_eq!(round_currency(dec("10597.16")).to_string(), "10597.16");
    }
}
