//! Gregorian and approximate Hijri date formatting.
//!
//! All dates are converted to the configured canonical timezone before
//! formatting, so output does not depend on the host timezone.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use super::config::FormatConfig;

const GREGORIAN_MONTHS: [&str; 12] = [
    "يناير", "فبراير", "مارس", "أبريل", "مايو", "يونيو",
    "يوليو", "أغسطس", "سبتمبر", "أكتوبر", "نوفمبر", "ديسمبر",
];

const HIJRI_MONTHS: [&str; 12] = [
    "محرم", "صفر", "ربيع الأول", "ربيع الثاني", "جمادى الأولى", "جمادى الثانية",
    "رجب", "شعبان", "رمضان", "شوال", "ذو القعدة", "ذو الحجة",
];

/// Ratio of solar to lunar year length, scaled by 10^6.
const LUNAR_RATIO_MICROS: i64 = 1_030_684;
const MICROS: i64 = 1_000_000;

/// Format a date as `DD/MM/YYYY` in the canonical timezone.
#[must_use]
pub fn format_gregorian_date(date: DateTime<Utc>, config: &FormatConfig) -> String {
    date.with_timezone(&config.timezone)
        .format("%d/%m/%Y")
        .to_string()
}

/// Format a date as `14 أكتوبر 2026` in the canonical timezone.
#[must_use]
pub fn format_long_date(date: DateTime<Utc>, config: &FormatConfig) -> String {
    let local = date.with_timezone(&config.timezone);
    format!(
        "{} {} {}",
        local.day(),
        GREGORIAN_MONTHS[local.month0() as usize],
        local.year()
    )
}

/// An approximate Hijri calendar date.
///
/// Produced by linear scaling of the Gregorian date, not by a lunar table.
/// It drifts by up to a month, ignores leap months, and must not be used
/// where an authoritative Hijri date is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HijriDate {
    /// Hijri year.
    pub year: i32,
    /// Month number (1-12).
    pub month: u32,
    /// Day of month (1-30).
    pub day: u32,
}

impl HijriDate {
    /// Arabic month name.
    #[must_use]
    pub fn month_name(&self) -> &'static str {
        HIJRI_MONTHS[(self.month.clamp(1, 12) - 1) as usize]
    }
}

impl std::fmt::Display for HijriDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}هـ", self.day, self.month_name(), self.year)
    }
}

/// Approximate the Hijri date for `date` in the canonical timezone.
#[must_use]
pub fn approximate_hijri_date(date: DateTime<Utc>, config: &FormatConfig) -> HijriDate {
    let local = date.with_timezone(&config.timezone);

    let year = scale(i64::from(local.year()) - 622) + 1;
    let month = scale(i64::from(local.month0())) + 1;
    let day = scale(i64::from(local.day()));

    HijriDate {
        year: i32::try_from(year).unwrap_or(i32::MAX),
        month: u32::try_from(month.clamp(1, 12)).unwrap_or(1),
        day: u32::try_from(day.clamp(1, 30)).unwrap_or(1),
    }
}

fn scale(value: i64) -> i64 {
    (value * LUNAR_RATIO_MICROS).div_euclid(MICROS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[test]
    fn test_gregorian_uses_canonical_timezone() {
        let config = FormatConfig::default();
        // 22:30 UTC is already the next day in Riyadh (UTC+3).
        let date = Utc.with_ymd_and_hms(2026, 3, 31, 22, 30, 0).unwrap();
        assert_eq!(format_gregorian_date(date, &config), "01/04/2026");
    }

    #[test]
    fn test_long_date_uses_arabic_month_names() {
        let config = FormatConfig::default();
        let date = Utc.with_ymd_and_hms(2026, 10, 14, 9, 0, 0).unwrap();
        assert_eq!(format_long_date(date, &config), "14 أكتوبر 2026");
    }

    #[rstest]
    #[case(2026, 10, 14, HijriDate { year: 1448, month: 10, day: 14 })]
    #[case(2024, 1, 1, HijriDate { year: 1446, month: 1, day: 1 })]
    #[case(2025, 12, 31, HijriDate { year: 1447, month: 12, day: 30 })]
    fn test_hijri_approximation(
        #[case] year: i32,
        #[case] month: u32,
        #[case] day: u32,
        #[case] expected: HijriDate,
    ) {
        let config = FormatConfig::default();
        let date = Utc.with_ymd_and_hms(year, month, day, 9, 0, 0).unwrap();
        assert_eq!(approximate_hijri_date(date, &config), expected);
    }

    #[test]
    fn test_hijri_display() {
        let hijri = HijriDate {
            year: 1448,
            month: 9,
            day: 3,
        };
        assert_eq!(hijri.to_string(), "3 رمضان 1448هـ");
    }
}
