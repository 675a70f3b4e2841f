//! Locale formatting shared by every rendering target.
//!
//! - Currency amounts with Banker's Rounding and digit grouping
//! - Gregorian dates in a fixed canonical timezone
//! - Approximate Hijri dates (arithmetic, non-authoritative)
//! - Arabic-Indic digit substitution
//! - Status and severity label translation

pub mod calendar;
pub mod config;
pub mod currency;
pub mod labels;
pub mod numerals;

pub use calendar::{HijriDate, approximate_hijri_date, format_gregorian_date, format_long_date};
pub use config::{FormatConfig, FormatError, NumeralSystem};
pub use currency::{format_currency, parse_currency, round_money, sum_money};
pub use labels::{NOT_AVAILABLE, NOT_SPECIFIED, translate_severity, translate_status};
pub use numerals::to_localized_numerals;
