//! Currency codes used when formatting amounts.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` everywhere; this module only names the
//! currency an amount is reported in. No conversion between currencies happens.

use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes supported by the report formatter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Saudi Riyal
    #[default]
    Sar,
    /// UAE Dirham
    Aed,
    /// Kuwaiti Dinar
    Kwd,
    /// US Dollar
    Usd,
}

impl Currency {
    /// Symbol appended after formatted amounts.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Sar => "ر.س",
            Self::Aed => "د.إ",
            Self::Kwd => "د.ك",
            Self::Usd => "$",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sar => write!(f, "SAR"),
            Self::Aed => write!(f, "AED"),
            Self::Kwd => write!(f, "KWD"),
            Self::Usd => write!(f, "USD"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SAR" => Ok(Self::Sar),
            "AED" => Ok(Self::Aed),
            "KWD" => Ok(Self::Kwd),
            "USD" => Ok(Self::Usd),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[test]
    fn test_currency_display() {
        assert_eq!(Currency::Sar.to_string(), "SAR");
        assert_eq!(Currency::Aed.to_string(), "AED");
        assert_eq!(Currency::Kwd.to_string(), "KWD");
        assert_eq!(Currency::Usd.to_string(), "USD");
    }

    #[rstest]
    #[case("SAR", Currency::Sar)]
    #[case("sar", Currency::Sar)]
    #[case("AED", Currency::Aed)]
    #[case("kwd", Currency::Kwd)]
    #[case("USD", Currency::Usd)]
    fn test_currency_from_str(#[case] input: &str, #[case] expected: Currency) {
        assert_eq!(Currency::from_str(input).unwrap(), expected);
    }

    #[test]
    fn test_currency_from_str_rejects_unknown() {
        assert!(Currency::from_str("XXX").is_err());
        assert!(Currency::from_str("").is_err());
    }

    #[test]
    fn test_default_currency_is_riyal() {
        assert_eq!(Currency::default(), Currency::Sar);
        assert_eq!(Currency::default().symbol(), "ر.س");
    }
}
