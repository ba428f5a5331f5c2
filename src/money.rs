// 💵 Currency arithmetic
// Money is rust_decimal::Decimal end to end. Nothing is rounded mid-computation;
// round_currency is for callers presenting a final figure.
//
// Loaded amounts are bounded so that the worst chain (ntd * rate, minus costs,
// divided by the smallest sell price) stays inside Decimal's range.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde_json::Value;
use std::str::FromStr;

/// Decimal places used when presenting NTD or USD amounts
pub const CURRENCY_DP: u32 = 2;

/// Largest magnitude accepted for any loaded figure, and for the queried NTD amount
pub const MAX_AMOUNT: Decimal = dec!(1000000000);

/// Most decimal places accepted for a loaded figure
pub const MAX_SCALE: u32 = 6;

/// Round to cents, midpoint away from zero
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// True when `value` is within `MAX_AMOUNT` and has at most `MAX_SCALE` significant decimals
pub fn within_bounds(value: Decimal) -> bool {
    value.abs() <= MAX_AMOUNT && value.normalize().scale() <= MAX_SCALE
}

/// Read a JSON number or numeric string as an exact decimal.
///
/// Numbers go through their decimal text, so 30.8 stays exactly 30.8.
/// Returns None for null, booleans, containers and non-numeric text.
pub fn decimal_from_json(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_round_currency_midpoint() {
        assert_eq!(round_currency(dec!(22674.805194)), dec!(22674.81));
        assert_eq!(round_currency(dec!(0.005)), dec!(0.01));
        assert_eq!(round_currency(dec!(-0.005)), dec!(-0.01));
    }

    #[test]
    fn test_decimal_from_json_is_exact() {
        assert_eq!(decimal_from_json(&json!(30.8)), Some(dec!(30.8)));
        assert_eq!(decimal_from_json(&json!(700000)), Some(dec!(700000)));
        assert_eq!(decimal_from_json(&json!(0.001)), Some(dec!(0.001)));
    }

    #[test]
    fn test_decimal_from_json_reads_numeric_text() {
        assert_eq!(decimal_from_json(&json!("30.80")), Some(dec!(30.8)));
        assert_eq!(decimal_from_json(&json!(" 0.0005 ")), Some(dec!(0.0005)));
        assert_eq!(decimal_from_json(&json!("1e2")), Some(dec!(100)));
    }

    #[test]
    fn test_decimal_from_json_rejects_non_numbers() {
        assert_eq!(decimal_from_json(&json!("cheap")), None);
        assert_eq!(decimal_from_json(&json!("")), None);
        assert_eq!(decimal_from_json(&Value::Null), None);
        assert_eq!(decimal_from_json(&json!(true)), None);
    }

    #[test]
    fn test_within_bounds() {
        assert!(within_bounds(dec!(700000)));
        assert!(within_bounds(MAX_AMOUNT));
        assert!(within_bounds(-MAX_AMOUNT));
        assert!(within_bounds(dec!(0.000001)));
        assert!(within_bounds(dec!(30.8000000000)));
        assert!(!within_bounds(MAX_AMOUNT + dec!(1)));
        assert!(!within_bounds(dec!(0.0000001)));
        assert!(!within_bounds(Decimal::MAX));
    }
}
