//! Digit glyph substitution.

/// Replace ASCII digits with Arabic-Indic digits (`٠١٢٣٤٥٦٧٨٩`).
///
/// Only digits change; separators and signs pass through. The result is for
/// display and does not parse as a number.
#[must_use]
pub fn to_localized_numerals(value: impl std::fmt::Display) -> String {
    value
        .to_string()
        .chars()
        .map(|c| match c.to_digit(10) {
            Some(d) if c.is_ascii_digit() => char::from_u32(0x0660 + d).unwrap_or(c),
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_are_substituted() {
        assert_eq!(to_localized_numerals(1_234_567), "١٢٣٤٥٦٧");
        assert_eq!(to_localized_numerals("0123456789"), "٠١٢٣٤٥٦٧٨٩");
    }

    #[test]
    fn test_non_digits_pass_through() {
        assert_eq!(to_localized_numerals("1,250.50 ر.س"), "١,٢٥٠.٥٠ ر.س");
        assert_eq!(to_localized_numerals("-"), "-");
    }
}
