//! Currency formatting with Banker's Rounding.

use std::str::FromStr;

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use super::config::FormatConfig;

/// Round a monetary value to 2 decimal places using Banker's Rounding.
#[must_use]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// Sum of monetary values, saturating at the `Decimal` range.
#[must_use]
pub fn sum_money<I: IntoIterator<Item = Decimal>>(values: I) -> Decimal {
    values.into_iter().fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Format an amount as `1,234,567.89 ر.س`.
///
/// Rounds half-to-even at 2 decimals and always prints both decimals. Digits
/// are ASCII; apply [`FormatConfig::localize`] for Arabic-Indic glyphs.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use rasid_core::formatting::{FormatConfig, format_currency};
///
/// let config = FormatConfig::default();
/// assert_eq!(format_currency(dec!(1234.565), &config), "1,234.56 ر.س");
/// ```
#[must_use]
pub fn format_currency(amount: Decimal, config: &FormatConfig) -> String {
    let mut rounded = round_money(amount);
    rounded.rescale(2);

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = rounded.abs().to_string();
    let (integer, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    format!(
        "{sign}{}.{fraction} {}",
        group_thousands(integer),
        config.currency.symbol()
    )
}

/// Parse text produced by [`format_currency`] back into an amount.
///
/// Returns `None` when the text is not a formatted amount.
#[must_use]
pub fn parse_currency(text: &str, config: &FormatConfig) -> Option<Decimal> {
    let number = text
        .trim()
        .strip_suffix(config.currency.symbol())?
        .trim()
        .replace(',', "");
    Decimal::from_str(&number).ok()
}

fn group_thousands(integer: &str) -> String {
    let len = integer.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
