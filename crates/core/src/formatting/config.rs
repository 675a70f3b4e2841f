//! Explicit formatting configuration threaded through every render call.

use std::str::FromStr;

use chrono_tz::Tz;
use rasid_shared::config::FormatSettings;
use rasid_shared::types::Currency;
use thiserror::Error;

use super::numerals::to_localized_numerals;

/// Errors raised while building a [`FormatConfig`] from settings.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Timezone name is not in the IANA database.
    #[error("unknown timezone: {0}")]
    InvalidTimezone(String),

    /// Numeral system name is not recognized.
    #[error("unknown numeral system: {0}")]
    InvalidNumerals(String),
}

/// Digit glyphs used in rendered documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NumeralSystem {
    /// ASCII digits `0-9`.
    #[default]
    Western,
    /// Arabic-Indic digits `٠-٩`.
    ArabicIndic,
}

impl FromStr for NumeralSystem {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "western" | "latn" => Ok(Self::Western),
            "arabic_indic" | "arab" => Ok(Self::ArabicIndic),
            _ => Err(FormatError::InvalidNumerals(s.to_string())),
        }
    }
}

/// Formatting configuration.
///
/// Built once per call site and passed by reference; there is no global
/// locale state.
#[derive(Debug, Clone)]
pub struct FormatConfig {
    /// Currency whose symbol suffixes formatted amounts.
    pub currency: Currency,
    /// Canonical timezone for printed dates and calendar boundaries.
    pub timezone: Tz,
    /// Digit glyphs for rendered text.
    pub numerals: NumeralSystem,
    /// Organization name printed as the document subtitle.
    pub organization: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self::from_settings(&FormatSettings::default()).unwrap_or(Self {
            currency: Currency::Sar,
            timezone: chrono_tz::Asia::Riyadh,
            numerals: NumeralSystem::Western,
            organization: String::new(),
        })
    }
}

impl FormatConfig {
    /// Builds a configuration from loaded settings.
    pub fn from_settings(settings: &FormatSettings) -> Result<Self, FormatError> {
        let timezone = settings
            .timezone
            .parse::<Tz>()
            .map_err(|_| FormatError::InvalidTimezone(settings.timezone.clone()))?;

        Ok(Self {
            currency: settings.currency,
            timezone,
            numerals: settings.numerals.parse()?,
            organization: settings.organization.clone(),
        })
    }

    /// Set the numeral system.
    #[must_use]
    pub fn with_numerals(mut self, numerals: NumeralSystem) -> Self {
        self.numerals = numerals;
        self
    }

    /// Applies the configured digit glyphs to already formatted text.
    #[must_use]
    pub fn localize(&self, text: &str) -> String {
        match self.numerals {
            NumeralSystem::Western => text.to_string(),
            NumeralSystem::ArabicIndic => to_localized_numerals(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FormatConfig::default();
        assert_eq!(config.currency, Currency::Sar);
        assert_eq!(config.timezone, chrono_tz::Asia::Riyadh);
        assert_eq!(config.numerals, NumeralSystem::Western);
        assert!(!config.organization.is_empty());
    }

    #[test]
    fn test_from_settings_rejects_unknown_timezone() {
        let settings = FormatSettings {
            timezone: "Mars/Olympus".to_string(),
            ..FormatSettings::default()
        };
        let err = FormatConfig::from_settings(&settings).unwrap_err();
        assert!(matches!(err, FormatError::InvalidTimezone(_)));
    }

    #[test]
    fn test_from_settings_rejects_unknown_numerals() {
        let settings = FormatSettings {
            numerals: "roman".to_string(),
            ..FormatSettings::default()
        };
        let err = FormatConfig::from_settings(&settings).unwrap_err();
        assert!(matches!(err, FormatError::InvalidNumerals(_)));
    }

    #[test]
    fn test_localize_follows_numeral_system() {
        let western = FormatConfig::default();
        assert_eq!(western.localize("2026"), "2026");

        let arabic = FormatConfig::default().with_numerals(NumeralSystem::ArabicIndic);
        assert_eq!(arabic.localize("2026"), "٢٠٢٦");
    }
}
