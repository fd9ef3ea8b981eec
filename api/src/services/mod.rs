pub mod accrual;
pub mod daily_roi;
pub mod deposits;
pub mod investments;
pub mod plans;
pub mod users;
pub mod wallet;

use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use crate::error::{AppError, AppResult};

/// Reads a decimal from a JSON number or numeric string.
///
/// Request bodies carry amounts loosely typed, so this is where a value
/// like `"abc"` or `true` turns into a `Validation` error instead of a
/// deserialization rejection.
pub fn parse_decimal(field: &str, raw: Option<&Value>) -> AppResult<Decimal> {
    let text = match raw {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        _ => return Err(AppError::validation(format!("{} must be a number", field))),
    };
    // Scientific notation is what serde_json prints for very large/small floats.
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| AppError::validation(format!("{} must be a number", field)))
}

/// Money columns are `DECIMAL(20, 8)`: twelve integer digits, eight fractional.
const MONEY_SCALE: u32 = 8;
const MONEY_INTEGER_LIMIT: i64 = 1_000_000_000_000;

/// Whether `amount` can be stored in a money column without overflow or rounding.
pub fn fits_money_column(amount: Decimal) -> bool {
    amount.abs() < Decimal::from(MONEY_INTEGER_LIMIT) && amount.normalize().scale() <= MONEY_SCALE
}

/// Adds to a stored balance, rejecting results a money column cannot hold.
pub fn add_to_balance(balance: Decimal, amount: Decimal) -> AppResult<Decimal> {
    balance
        .checked_add(amount)
        .filter(|total| fits_money_column(*total))
        .ok_or_else(|| AppError::validation("Resulting balance exceeds the supported range"))
}

/// Trims an identifier and rejects it when missing or blank.
pub fn require_id(field: &str, raw: Option<&str>) -> AppResult<String> {
    match raw.map(str::trim) {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(AppError::validation(format!("{} is required", field))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_parse_decimal_accepts_numbers_and_numeric_strings() {
        assert_eq!(parse_decimal("amount", Some(&json!(50))).unwrap(), dec!(50));
        assert_eq!(parse_decimal("amount", Some(&json!(12.5))).unwrap(), dec!(12.5));
        assert_eq!(parse_decimal("amount", Some(&json!(" 7.25 "))).unwrap(), dec!(7.25));
    }

    #[test]
    fn test_parse_decimal_rejects_non_numeric() {
        assert!(matches!(parse_decimal("amount", None), Err(AppError::Validation(_))));
        assert!(matches!(parse_decimal("amount", Some(&json!("abc"))), Err(AppError::Validation(_))));
        assert!(matches!(parse_decimal("amount", Some(&json!(true))), Err(AppError::Validation(_))));
        assert!(matches!(parse_decimal("amount", Some(&json!(""))), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_money_column_bounds() {
        assert!(fits_money_column(dec!(999999999999.99999999)));
        assert!(fits_money_column(dec!(12.50000000000)));
        assert!(!fits_money_column(dec!(1000000000000)));
        assert!(!fits_money_column(dec!(0.000000001)));
        assert!(!fits_money_column(Decimal::MAX));
    }

    #[test]
    fn test_add_to_balance_never_overflows() {
        assert_eq!(add_to_balance(dec!(100), dec!(50)).unwrap(), dec!(150));
        assert!(matches!(add_to_balance(dec!(100), Decimal::MAX), Err(AppError::Validation(_))));
        assert!(matches!(
            add_to_balance(dec!(999999999999), dec!(1)),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_require_id() {
        assert_eq!(require_id("userId", Some(" u1 ")).unwrap(), "u1");
        assert!(require_id("userId", Some("  ")).is_err());
        assert!(require_id("userId", None).is_err());
    }
}
