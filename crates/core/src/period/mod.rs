//! Period resolution.
//!
//! Named periods ("today", "week", "month", "quarter", "year") and custom
//! ranges are resolved to half-open `[start, end)` UTC ranges. Calendar
//! boundaries are computed in the configured canonical timezone.

mod resolver;
mod types;

pub use resolver::{previous_period, resolve, resolve_spec};
pub use types::{PeriodError, PeriodName, PeriodRange, PeriodSpec};
