//! Per-call formatting options.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{L10nError, Result};

/// Largest number of fraction digits accepted by the formatters.
pub const MAX_FRACTION_DIGITS: u8 = 20;

/// Largest minimum integer digit count accepted by the formatters.
pub const MAX_INTEGER_DIGITS: u8 = 21;

/// How a number is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberStyle {
    /// Plain decimal number.
    #[default]
    Decimal,
    /// Value multiplied by 100 with a percent sign.
    Percent,
    /// Monetary amount in a currency.
    Currency,
}

/// How the currency is shown in currency style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurrencyDisplay {
    /// Localized symbol such as `$` or `€`.
    #[default]
    Symbol,
    /// ISO 4217 code such as `USD`.
    Code,
    /// Display name such as `US dollars`.
    Name,
}

/// Options for number, percent and currency formatting.
///
/// Fraction digit defaults depend on the style: decimal `0..=3`, percent
/// `0..=0`, currency uses the currency's minor units. Setting only the minimum
/// raises the maximum to at least the minimum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormatOptions {
    /// Presentation style.
    pub style: NumberStyle,
    /// Integer part is zero-padded to this many digits.
    pub minimum_integer_digits: u8,
    /// Minimum fraction digits (trailing zeros are kept up to this count).
    pub minimum_fraction_digits: Option<u8>,
    /// Maximum fraction digits (the value is rounded half away from zero).
    pub maximum_fraction_digits: Option<u8>,
    /// Insert group separators.
    pub use_grouping: bool,
    /// Currency presentation for currency style.
    pub currency_display: CurrencyDisplay,
}

impl Default for NumberFormatOptions {
    fn default() -> Self {
        Self {
            style: NumberStyle::Decimal,
            minimum_integer_digits: 1,
            minimum_fraction_digits: None,
            maximum_fraction_digits: None,
            use_grouping: true,
            currency_display: CurrencyDisplay::Symbol,
        }
    }
}

/// Fraction and integer digit counts after defaults were applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitRange {
    pub minimum_integer: u8,
    pub minimum_fraction: u8,
    pub maximum_fraction: u8,
}

impl NumberFormatOptions {
    /// Decimal style with default digits.
    pub fn decimal() -> Self {
        Self::default()
    }

    /// Percent style with default digits.
    pub fn percent() -> Self {
        Self {
            style: NumberStyle::Percent,
            ..Self::default()
        }
    }

    /// Currency style with the currency's default digits.
    pub fn currency() -> Self {
        Self {
            style: NumberStyle::Currency,
            ..Self::default()
        }
    }

    /// Parse a digit-info string `minInteger.minFraction-maxFraction` (e.g. `"1.2-2"`).
    ///
    /// Every part is optional: `"3."`, `".1-4"` and `"2"` are all accepted.
    pub fn from_digits(digits: &str) -> Result<Self> {
        static PATTERN: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();
        let pattern = PATTERN
            .get_or_init(|| Regex::new(r"^(\d+)?(?:\.(\d+)?(?:-(\d+))?)?$"))
            .as_ref()
            .map_err(|e| L10nError::format(e.to_string()))?;

        let captures = pattern
            .captures(digits.trim())
            .ok_or_else(|| L10nError::format(format!("invalid digit info '{digits}'")))?;
        let part = |index: usize| -> Result<Option<u8>> {
            captures
                .get(index)
                .map(|m| {
                    m.as_str()
                        .parse::<u8>()
                        .map_err(|_| L10nError::format(format!("digit count out of range in '{digits}'")))
                })
                .transpose()
        };

        let mut options = Self::default();
        if let Some(min_int) = part(1)? {
            options.minimum_integer_digits = min_int;
        }
        options.minimum_fraction_digits = part(2)?;
        options.maximum_fraction_digits = part(3)?;
        options.resolve_digits(0)?;
        Ok(options)
    }

    /// Set the style.
    pub fn with_style(mut self, style: NumberStyle) -> Self {
        self.style = style;
        self
    }

    /// Set minimum and maximum fraction digits.
    pub fn with_fraction_digits(mut self, minimum: u8, maximum: u8) -> Self {
        self.minimum_fraction_digits = Some(minimum);
        self.maximum_fraction_digits = Some(maximum);
        self
    }

    /// Set only the minimum fraction digits.
    pub fn with_minimum_fraction_digits(mut self, minimum: u8) -> Self {
        self.minimum_fraction_digits = Some(minimum);
        self
    }

    /// Set only the maximum fraction digits.
    pub fn with_maximum_fraction_digits(mut self, maximum: u8) -> Self {
        self.maximum_fraction_digits = Some(maximum);
        self
    }

    /// Set the minimum integer digits.
    pub fn with_minimum_integer_digits(mut self, digits: u8) -> Self {
        self.minimum_integer_digits = digits;
        self
    }

    /// Enable or disable grouping separators.
    pub fn with_grouping(mut self, use_grouping: bool) -> Self {
        self.use_grouping = use_grouping;
        self
    }

    /// Set the currency presentation.
    pub fn with_currency_display(mut self, display: CurrencyDisplay) -> Self {
        self.currency_display = display;
        self
    }

    /// Apply style defaults and validate the digit counts.
    ///
    /// `currency_digits` is the minor unit count used by currency style.
    pub fn resolve_digits(&self, currency_digits: u8) -> Result<DigitRange> {
        let (default_min, default_max) = match self.style {
            NumberStyle::Decimal => (0, 3),
            NumberStyle::Percent => (0, 0),
            NumberStyle::Currency => (currency_digits, currency_digits),
        };

        let (minimum_fraction, maximum_fraction) =
            match (self.minimum_fraction_digits, self.maximum_fraction_digits) {
                (None, None) => (default_min, default_max),
                (Some(min), None) => (min, min.max(default_max)),
                (None, Some(max)) => (default_min.min(max), max),
                (Some(min), Some(max)) => (min, max),
            };

        if minimum_fraction > maximum_fraction {
            return Err(L10nError::format(format!(
                "minimum fraction digits ({minimum_fraction}) exceed maximum ({maximum_fraction})"
            )));
        }
        if maximum_fraction > MAX_FRACTION_DIGITS {
            return Err(L10nError::format(format!(
                "maximum fraction digits must be at most {MAX_FRACTION_DIGITS}, got {maximum_fraction}"
            )));
        }
        if self.minimum_integer_digits == 0 || self.minimum_integer_digits > MAX_INTEGER_DIGITS {
            return Err(L10nError::format(format!(
                "minimum integer digits must be within 1..={MAX_INTEGER_DIGITS}, got {}",
                self.minimum_integer_digits
            )));
        }

        Ok(DigitRange {
            minimum_integer: self.minimum_integer_digits,
            minimum_fraction,
            maximum_fraction,
        })
    }
}

/// Date format length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateLength {
    /// Short format (e.g., "01/17/26" or "17/01/26")
    Short,
    /// Medium format (e.g., "Jan 17, 2026")
    #[default]
    Medium,
    /// Long format (e.g., "January 17, 2026")
    Long,
    /// Full format (e.g., "Saturday, January 17, 2026")
    Full,
}

/// Time format length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeLength {
    /// Short format (e.g., "03:45 PM" or "15:45")
    #[default]
    Short,
    /// Medium format (e.g., "03:45:30 PM")
    Medium,
    /// Long format (e.g., "03:45:30 PM EST")
    Long,
}

/// Options for date/time formatting.
///
/// With neither a date nor a time length, a medium date is produced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DateFormatOptions {
    /// Date part length, if the date is shown.
    pub date: Option<DateLength>,
    /// Time part length, if the time is shown.
    pub time: Option<TimeLength>,
    /// IANA timezone overriding the caller's timezone.
    pub time_zone: Option<String>,
}

impl DateFormatOptions {
    /// Date only.
    pub fn date(length: DateLength) -> Self {
        Self {
            date: Some(length),
            ..Self::default()
        }
    }

    /// Time only.
    pub fn time(length: TimeLength) -> Self {
        Self {
            time: Some(length),
            ..Self::default()
        }
    }

    /// Date and time.
    pub fn datetime(date: DateLength, time: TimeLength) -> Self {
        Self {
            date: Some(date),
            time: Some(time),
            time_zone: None,
        }
    }

    /// Set the timezone.
    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = Some(time_zone.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_defaults() {
        let range = NumberFormatOptions::decimal().resolve_digits(2).unwrap();
        assert_eq!((range.minimum_fraction, range.maximum_fraction), (0, 3));

        let range = NumberFormatOptions::percent().resolve_digits(2).unwrap();
        assert_eq!((range.minimum_fraction, range.maximum_fraction), (0, 0));

        let range = NumberFormatOptions::currency().resolve_digits(0).unwrap();
        assert_eq!((range.minimum_fraction, range.maximum_fraction), (0, 0));
    }

    #[test]
    fn test_minimum_raises_maximum() {
        let range = NumberFormatOptions::decimal()
            .with_minimum_fraction_digits(5)
            .resolve_digits(2)
            .unwrap();
        assert_eq!((range.minimum_fraction, range.maximum_fraction), (5, 5));

        let range = NumberFormatOptions::currency()
            .with_maximum_fraction_digits(1)
            .resolve_digits(2)
            .unwrap();
        assert_eq!((range.minimum_fraction, range.maximum_fraction), (1, 1));
    }

    #[test]
    fn test_invalid_digits() {
        assert!(NumberFormatOptions::decimal()
            .with_fraction_digits(3, 1)
            .resolve_digits(2)
            .unwrap_err()
            .is_format());
        assert!(NumberFormatOptions::decimal()
            .with_maximum_fraction_digits(21)
            .resolve_digits(2)
            .is_err());
        assert!(NumberFormatOptions::decimal()
            .with_minimum_integer_digits(0)
            .resolve_digits(2)
            .is_err());
    }

    #[test]
    fn test_from_digits() {
        let options = NumberFormatOptions::from_digits("1.2-2").unwrap();
        assert_eq!(options.minimum_integer_digits, 1);
        assert_eq!(options.minimum_fraction_digits, Some(2));
        assert_eq!(options.maximum_fraction_digits, Some(2));

        let options = NumberFormatOptions::from_digits("3.").unwrap();
        assert_eq!(options.minimum_integer_digits, 3);
        assert_eq!(options.minimum_fraction_digits, None);

        let options = NumberFormatOptions::from_digits(".0-4").unwrap();
        assert_eq!(options.maximum_fraction_digits, Some(4));

        assert!(NumberFormatOptions::from_digits("1.2-x").is_err());
        assert!(NumberFormatOptions::from_digits("1.5-2").is_err());
        assert!(NumberFormatOptions::from_digits("1.999-2").is_err());
    }
}
