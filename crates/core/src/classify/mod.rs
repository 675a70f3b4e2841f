//! Category classification.
//!
//! Groups records under a string key (category, status, method) into
//! buckets with count, total and share of the grand total.

mod breakdown;
mod percentage;

pub use breakdown::{Breakdown, CategoryBucket, classify};
pub use percentage::percentages_of_total;
