//! Key → bucket grouping.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::percentage::percentages_of_total;
use crate::formatting::sum_money;
use crate::payment::{OTHER_CATEGORY, PaymentRecord};

/// Aggregated count, sum and share for one classification key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBucket {
    /// Classification key.
    pub key: String,
    /// Number of records under the key.
    pub count: usize,
    /// Sum of amounts under the key.
    pub total_amount: Decimal,
    /// Share of the grand total, in percent at 2 decimal places.
    pub percentage_of_total: Decimal,
}

/// Ordered buckets: total descending, ties by ascending key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Breakdown {
    buckets: Vec<CategoryBucket>,
}

impl Breakdown {
    /// Buckets in display order.
    #[must_use]
    pub fn buckets(&self) -> &[CategoryBucket] {
        &self.buckets
    }

    /// Finds the bucket for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&CategoryBucket> {
        self.buckets.iter().find(|bucket| bucket.key == key)
    }

    /// Sum of every bucket's total.
    #[must_use]
    pub fn grand_total(&self) -> Decimal {
        sum_money(self.buckets.iter().map(|bucket| bucket.total_amount))
    }

    /// Number of buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Returns true if there are no buckets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Groups records by the key `key_fn` extracts.
///
/// A missing or blank key is filed under `"other"`.
pub fn classify<'a, I, F>(records: I, key_fn: F) -> Breakdown
where
    I: IntoIterator<Item = &'a PaymentRecord>,
    F: Fn(&'a PaymentRecord) -> Option<&'a str>,
{
    let mut groups: HashMap<&str, (usize, Decimal)> = HashMap::new();

    for record in records {
        let key = key_fn(record)
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .unwrap_or(OTHER_CATEGORY);
        let entry = groups.entry(key).or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 = entry.1.saturating_add(record.amount);
    }

    let mut buckets: Vec<CategoryBucket> = groups
        .into_iter()
        .map(|(key, (count, total_amount))| CategoryBucket {
            key: key.to_string(),
            count,
            total_amount,
            percentage_of_total: Decimal::ZERO,
        })
        .collect();

    buckets.sort_by(|a, b| {
        b.total_amount
            .cmp(&a.total_amount)
            .then_with(|| a.key.cmp(&b.key))
    });

    let totals: Vec<Decimal> = buckets.iter().map(|b| b.total_amount).collect();
    for (bucket, share) in buckets.iter_mut().zip(percentages_of_total(&totals)) {
        bucket.percentage_of_total = share;
    }

    Breakdown { buckets }
}
