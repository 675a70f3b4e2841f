//! Percentage shares using the Largest Remainder Method.
//!
//! 1. Compute each exact share of 100
//! 2. Truncate each share to 2 decimal places
//! 3. Hand the missing hundredths to the largest truncated remainders
//!
//! The result always sums to exactly 100.00 when the total is non-zero.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;

use crate::formatting::sum_money;

const PERCENT_DP: u32 = 2;

/// Computes each amount's share of their sum, in percent at 2 decimal places.
///
/// Ties between equal remainders go to the earlier amount, so callers that
/// pass amounts in display order get a stable result. A zero (or empty) total
/// yields zero everywhere.
///
/// ```
/// use rust_decimal_macros::dec;
/// use rasid_core::classify::percentages_of_total;
///
/// let shares = percentages_of_total(&[dec!(1), dec!(1), dec!(1)]);
/// assert_eq!(shares, vec![dec!(33.34), dec!(33.33), dec!(33.33)]);
/// ```
#[must_use]
pub fn percentages_of_total(amounts: &[Decimal]) -> Vec<Decimal> {
    let total = sum_money(amounts.iter().copied());
    if total.is_zero() {
        return vec![Decimal::ZERO; amounts.len()];
    }

    let unit = Decimal::new(1, PERCENT_DP);

    let exact: Vec<Decimal> = amounts
        .iter()
        .map(|amount| *amount / total * Decimal::ONE_HUNDRED)
        .collect();

    let mut rounded: Vec<Decimal> = exact
        .iter()
        .map(|share| share.round_dp_with_strategy(PERCENT_DP, RoundingStrategy::ToZero))
        .collect();

    let sum_rounded: Decimal = rounded.iter().copied().sum();
    let remainder = Decimal::ONE_HUNDRED - sum_rounded;

    let units = (remainder / unit)
        .round_dp_with_strategy(0, RoundingStrategy::ToZero)
        .to_usize()
        .unwrap_or(0)
        .min(amounts.len());

    // Stable sort keeps input order among equal remainders.
    let mut by_remainder: Vec<(usize, Decimal)> = exact
        .iter()
        .zip(&rounded)
        .map(|(exact, rounded)| *exact - *rounded)
        .enumerate()
        .collect();
    by_remainder.sort_by(|a, b| b.1.cmp(&a.1));

    for (idx, _) in by_remainder.into_iter().take(units) {
        rounded[idx] += unit;
    }

    rounded
}
