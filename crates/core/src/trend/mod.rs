//! Period-over-period trend comparison.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::classify::Breakdown;

/// Direction of change between two periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    /// Current exceeds previous.
    Up,
    /// Current is below previous.
    Down,
    /// No change.
    Stable,
}

impl TrendDirection {
    /// Returns the direction as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Stable => "stable",
        }
    }
}

/// Current vs previous value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendMetric {
    /// Value in the current period.
    pub current_value: Decimal,
    /// Value in the previous period.
    pub previous_value: Decimal,
    /// `(current - previous) / previous * 100`, 2 decimal places; 0 when previous is 0.
    pub percentage_change: Decimal,
    /// Direction of change.
    pub direction: TrendDirection,
}

/// A trend for one category key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTrend {
    /// Category key.
    pub key: String,
    /// Change in the category's total amount.
    pub metric: TrendMetric,
}

/// Compares two values.
#[must_use]
pub fn compute_trend(current: Decimal, previous: Decimal) -> TrendMetric {
    let percentage_change = if previous.is_zero() {
        Decimal::ZERO
    } else {
        current
            .checked_sub(previous)
            .and_then(|delta| delta.checked_div(previous))
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .map_or_else(
                || if current > previous { Decimal::MAX } else { Decimal::MIN },
                |change| change.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven),
            )
    };

    let direction = match current.cmp(&previous) {
        std::cmp::Ordering::Greater => TrendDirection::Up,
        std::cmp::Ordering::Less => TrendDirection::Down,
        std::cmp::Ordering::Equal => TrendDirection::Stable,
    };

    TrendMetric {
        current_value: current,
        previous_value: previous,
        percentage_change,
        direction,
    }
}

/// Matches category buckets by key.
///
/// Current keys come first in their breakdown order; keys only present in the
/// previous period follow with a current value of 0.
#[must_use]
pub fn category_trends(current: &Breakdown, previous: &Breakdown) -> Vec<CategoryTrend> {
    let mut trends: Vec<CategoryTrend> = current
        .buckets()
        .iter()
        .map(|bucket| CategoryTrend {
            key: bucket.key.clone(),
            metric: compute_trend(
                bucket.total_amount,
                previous
                    .get(&bucket.key)
                    .map_or(Decimal::ZERO, |prev| prev.total_amount),
            ),
        })
        .collect();

    trends.extend(
        previous
            .buckets()
            .iter()
            .filter(|bucket| current.get(&bucket.key).is_none())
            .map(|bucket| CategoryTrend {
                key: bucket.key.clone(),
                metric: compute_trend(Decimal::ZERO, bucket.total_amount),
            }),
    );

    trends
}
