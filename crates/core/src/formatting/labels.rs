//! Fixed translation tables for rendered labels.
//!
//! Unknown values are returned verbatim.

use std::borrow::Cow;

/// Placeholder for missing optional values.
pub const NOT_SPECIFIED: &str = "غير محدد";

/// Placeholder for missing references.
pub const NOT_AVAILABLE: &str = "غير متوفر";

/// Translate a payment status to Arabic.
#[must_use]
pub fn translate_status(status: &str) -> Cow<'_, str> {
    let translated = match status {
        "paid" => "مدفوع",
        "pending" => "معلق",
        "failed" => "فاشل",
        "cancelled" => "ملغي",
        "refunded" => "مسترد",
        "active" => "نشط",
        "inactive" => "غير نشط",
        other => return Cow::Borrowed(other),
    };
    Cow::Borrowed(translated)
}

/// Translate an anomaly severity to Arabic.
#[must_use]
pub fn translate_severity(severity: &str) -> Cow<'_, str> {
    let translated = match severity {
        "high" => "عالي",
        "medium" => "متوسط",
        "low" => "منخفض",
        other => return Cow::Borrowed(other),
    };
    Cow::Borrowed(translated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("paid", "مدفوع")]
    #[case("pending", "معلق")]
    #[case("failed", "فاشل")]
    #[case("cancelled", "ملغي")]
    #[case("refunded", "مسترد")]
    #[case("on_hold", "on_hold")]
    fn test_translate_status(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(translate_status(input), expected);
    }

    #[rstest]
    #[case("high", "عالي")]
    #[case("medium", "متوسط")]
    #[case("low", "منخفض")]
    #[case("critical", "critical")]
    fn test_translate_severity(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(translate_severity(input), expected);
    }
}
