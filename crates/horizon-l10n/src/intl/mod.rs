//! Locale-aware formatting of numbers, percentages, currencies and dates,
//! and locale-aware string comparison through [`Collator`].
//!
//! All operations share one contract: a null or empty value yields `Ok(None)`,
//! invalid input or options yield [`L10nError::Format`], and nothing is cached
//! between calls.
//!
//! # Number Formatting
//!
//! ```
//! use horizon_l10n::intl::{IntlFormatter, NumberFormatOptions};
//!
//! let intl = IntlFormatter::new();
//! let options = NumberFormatOptions::decimal().with_minimum_fraction_digits(2);
//! let text = intl.format_number(1234.5, &options, "en-US", None).unwrap();
//! assert_eq!(text.as_deref(), Some("1,234.50"));
//!
//! let none = intl.format_number(None::<f64>, &options, "en-US", None).unwrap();
//! assert_eq!(none, None);
//! ```
//!
//! # Date/Time Formatting
//!
//! ```ignore
//! use horizon_l10n::intl::{DateFormatOptions, DateLength, IntlFormatter, TimeLength};
//!
//! let intl = IntlFormatter::new();
//! let options = DateFormatOptions::datetime(DateLength::Long, TimeLength::Short);
//! let text = intl.format_date(chrono::Utc::now(), &options, "fr-FR", "Europe/Paris")?;
//! ```

mod collator;
mod currency;
mod date;
mod number;
mod options;
mod parse;
mod symbols;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use horizon_l10n_core::logging::targets;

pub use collator::{Collator, Sensitivity, SortOrder};
pub use currency::CurrencyCode;
pub use date::DateTimeFormatter;
pub use number::{FormattedDigits, NumberFormatter};
pub use options::{
    CurrencyDisplay, DateFormatOptions, DateLength, DigitRange, NumberFormatOptions, NumberStyle,
    TimeLength, MAX_FRACTION_DIGITS, MAX_INTEGER_DIGITS,
};
pub use parse::NumberParser;
pub use symbols::{CurrencyPosition, LocaleSymbols};

use crate::config::is_currency_code;
use crate::error::{L10nError, Result};

const NBSP: char = '\u{00A0}';

/// A value handed to the number formatters.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FormatInput {
    /// Null or absent value.
    #[default]
    Empty,
    /// A numeric value.
    Number(f64),
    /// Text to be parsed as a plain number (`.` decimal separator).
    Text(String),
}

impl FormatInput {
    /// Resolve to a finite number, `None` for empty input.
    pub fn resolve(self) -> Result<Option<f64>> {
        let value = match self {
            Self::Empty => return Ok(None),
            Self::Number(value) => value,
            Self::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(None);
                }
                text.parse::<f64>()
                    .map_err(|_| L10nError::format(format!("'{text}' is not a number")))?
            }
        };
        if !value.is_finite() {
            return Err(L10nError::format(format!("{value} is not a finite number")));
        }
        Ok(Some(value))
    }
}

impl From<f64> for FormatInput {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<f32> for FormatInput {
    fn from(value: f32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i64> for FormatInput {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for FormatInput {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for FormatInput {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for FormatInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FormatInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<FormatInput>> From<Option<T>> for FormatInput {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

/// A value handed to the date formatter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DateInput {
    /// Null or absent value.
    #[default]
    Empty,
    /// An instant.
    Instant(DateTime<Utc>),
    /// Milliseconds since the Unix epoch.
    Millis(i64),
    /// RFC 3339 timestamp, or an ISO date / date-time without offset.
    Text(String),
    /// Wall-clock time in the target timezone.
    Naive(NaiveDateTime),
    /// Calendar date, midnight in the target timezone.
    Date(NaiveDate),
}

impl DateInput {
    /// Resolve to a zoned date-time, `None` for empty input.
    pub fn resolve(self, tz: Tz) -> Result<Option<DateTime<Tz>>> {
        let resolved = match self {
            Self::Empty => return Ok(None),
            Self::Instant(instant) => instant.with_timezone(&tz),
            Self::Millis(millis) => DateTime::from_timestamp_millis(millis)
                .ok_or_else(|| L10nError::format(format!("timestamp {millis} is out of range")))?
                .with_timezone(&tz),
            Self::Naive(naive) => Self::localize(naive, tz)?,
            Self::Date(date) => {
                let naive = date
                    .and_hms_opt(0, 0, 0)
                    .ok_or_else(|| L10nError::format(format!("invalid date {date}")))?;
                Self::localize(naive, tz)?
            }
            Self::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(None);
                }
                Self::parse_text(text, tz)?
            }
        };
        Ok(Some(resolved))
    }

    fn parse_text(text: &str, tz: Tz) -> Result<DateTime<Tz>> {
        if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
            return Ok(instant.with_timezone(&tz));
        }
        for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(text, pattern) {
                return Self::localize(naive, tz);
            }
        }
        if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            return Self::Date(date)
                .resolve(tz)?
                .ok_or_else(|| L10nError::format(format!("invalid date '{text}'")));
        }
        Err(L10nError::format(format!("'{text}' is not a date")))
    }

    fn localize(naive: NaiveDateTime, tz: Tz) -> Result<DateTime<Tz>> {
        tz.from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| L10nError::format(format!("{naive} does not exist in {tz}")))
    }
}

impl<Z: TimeZone> From<DateTime<Z>> for DateInput {
    fn from(value: DateTime<Z>) -> Self {
        Self::Instant(value.with_timezone(&Utc))
    }
}

impl From<i64> for DateInput {
    fn from(value: i64) -> Self {
        Self::Millis(value)
    }
}

impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for DateInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<NaiveDateTime> for DateInput {
    fn from(value: NaiveDateTime) -> Self {
        Self::Naive(value)
    }
}

impl From<NaiveDate> for DateInput {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl<T: Into<DateInput>> From<Option<T>> for DateInput {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

/// Stateless formatting front end.
///
/// Every call builds the locale-specific formatter it needs, so one instance
/// can be shared freely between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntlFormatter;

impl IntlFormatter {
    /// Create a formatter.
    pub fn new() -> Self {
        Self
    }

    /// Format a number in the style given by `options`.
    ///
    /// `currency` is required for [`NumberStyle::Currency`] and ignored otherwise.
    pub fn format_number(
        &self,
        value: impl Into<FormatInput>,
        options: &NumberFormatOptions,
        locale: &str,
        currency: Option<&str>,
    ) -> Result<Option<String>> {
        let Some(value) = value.into().resolve()? else {
            return Ok(None);
        };

        let code = match options.style {
            NumberStyle::Currency => {
                let code = currency.ok_or_else(|| {
                    L10nError::format("currency style requires a currency code")
                })?;
                if !is_currency_code(code.trim()) {
                    return Err(L10nError::format(format!(
                        "'{code}' is not an ISO 4217 currency code"
                    )));
                }
                Some(CurrencyCode::new(code))
            }
            _ => None,
        };

        let range = options.resolve_digits(code.as_ref().map_or(2, CurrencyCode::minor_units))?;
        let scaled = match options.style {
            NumberStyle::Percent => value * 100.0,
            _ => value,
        };
        if !scaled.is_finite() {
            return Err(L10nError::format(format!("{value} is out of range")));
        }

        let formatter = NumberFormatter::with_locale(locale);
        let formatted = formatter.format_digits(scaled, range, options.use_grouping);
        let symbols = formatter.symbols();
        let sign = if formatted.negative { "-" } else { "" };
        let digits = &formatted.digits;

        let text = match (options.style, code) {
            (NumberStyle::Percent, _) => match symbols.percent_space {
                Some(space) => format!("{sign}{digits}{space}%"),
                None => format!("{sign}{digits}%"),
            },
            (NumberStyle::Currency, Some(code)) => {
                Self::currency_text(&formatted, &code, options.currency_display, symbols)
            }
            _ => format!("{sign}{digits}"),
        };

        tracing::trace!(target: targets::INTL, locale, %text, "formatted number");
        Ok(Some(text))
    }

    /// Format a number as a percentage (`0.25` -> `25%`).
    pub fn format_percent(
        &self,
        value: impl Into<FormatInput>,
        options: &NumberFormatOptions,
        locale: &str,
    ) -> Result<Option<String>> {
        let options = options.clone().with_style(NumberStyle::Percent);
        self.format_number(value, &options, locale, None)
    }

    /// Format a monetary amount.
    pub fn format_currency(
        &self,
        value: impl Into<FormatInput>,
        options: &NumberFormatOptions,
        locale: &str,
        currency: &str,
    ) -> Result<Option<String>> {
        let options = options.clone().with_style(NumberStyle::Currency);
        self.format_number(value, &options, locale, Some(currency))
    }

    /// Format a date and/or time.
    ///
    /// `options.time_zone` takes precedence over `time_zone`.
    pub fn format_date(
        &self,
        value: impl Into<DateInput>,
        options: &DateFormatOptions,
        locale: &str,
        time_zone: &str,
    ) -> Result<Option<String>> {
        let zone = options.time_zone.as_deref().unwrap_or(time_zone);
        let tz: Tz = zone
            .trim()
            .parse()
            .map_err(|_| L10nError::format(format!("unknown timezone '{zone}'")))?;

        let Some(datetime) = value.into().resolve(tz)? else {
            return Ok(None);
        };

        let text = DateTimeFormatter::with_locale(locale).format(&datetime, options.date, options.time);
        tracing::trace!(target: targets::INTL, locale, %text, "formatted date");
        Ok(Some(text))
    }

    /// Parse a number written with the locale's separators.
    ///
    /// Returns `Ok(None)` when the text is not a well-formed number.
    pub fn parse_number(&self, text: &str, locale: &str) -> Result<Option<f64>> {
        Ok(NumberParser::for_locale(locale)?.parse(text))
    }

    fn currency_text(
        formatted: &FormattedDigits,
        code: &CurrencyCode,
        display: CurrencyDisplay,
        symbols: &LocaleSymbols,
    ) -> String {
        let sign = if formatted.negative { "-" } else { "" };
        let digits = &formatted.digits;

        match display {
            CurrencyDisplay::Symbol => {
                let symbol = code.symbol();
                match symbols.currency_position {
                    CurrencyPosition::Prefix => format!("{sign}{symbol}{digits}"),
                    CurrencyPosition::PrefixSpaced => format!("{symbol}{NBSP}{sign}{digits}"),
                    CurrencyPosition::Suffix => format!("{sign}{digits}{NBSP}{symbol}"),
                }
            }
            CurrencyDisplay::Code => match symbols.currency_position {
                CurrencyPosition::Suffix => format!("{sign}{digits}{NBSP}{code}"),
                _ => format!("{sign}{code}{NBSP}{digits}"),
            },
            CurrencyDisplay::Name => {
                format!("{sign}{digits} {}", code.display_name(!formatted.is_one))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_none() {
        let intl = IntlFormatter::new();
        let options = NumberFormatOptions::default();
        assert_eq!(intl.format_number(FormatInput::Empty, &options, "en-US", None).unwrap(), None);
        assert_eq!(intl.format_number(None::<f64>, &options, "en-US", None).unwrap(), None);
        assert_eq!(intl.format_number("  ", &options, "en-US", None).unwrap(), None);
        assert_eq!(intl.format_percent(None::<i64>, &options, "en-US").unwrap(), None);
        assert_eq!(
            intl.format_date(DateInput::Empty, &DateFormatOptions::default(), "en-US", "UTC")
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_decimal_formatting() {
        let intl = IntlFormatter::new();
        let options = NumberFormatOptions::decimal().with_minimum_fraction_digits(2);
        assert_eq!(
            intl.format_number(1234.5, &options, "en-US", None).unwrap().as_deref(),
            Some("1,234.50")
        );
        assert_eq!(
            intl.format_number("1234.5", &options, "en-US", None).unwrap().as_deref(),
            Some("1,234.50")
        );
        assert_eq!(
            intl.format_number(3.14159, &NumberFormatOptions::default(), "en-US", None)
                .unwrap()
                .as_deref(),
            Some("3.142")
        );
    }

    #[test]
    fn test_invalid_input_is_format_error() {
        let intl = IntlFormatter::new();
        let options = NumberFormatOptions::default();
        assert!(intl.format_number("abc", &options, "en-US", None).unwrap_err().is_format());
        assert!(intl.format_number(f64::NAN, &options, "en-US", None).unwrap_err().is_format());
        assert!(intl
            .format_number(f64::INFINITY, &options, "en-US", None)
            .unwrap_err()
            .is_format());
        assert!(intl
            .format_number(1.0, &NumberFormatOptions::currency(), "en-US", None)
            .unwrap_err()
            .is_format());
        assert!(intl.format_currency(1.0, &options, "en-US", "dollars").is_err());
    }

    #[test]
    fn test_percent_formatting() {
        let intl = IntlFormatter::new();
        let options = NumberFormatOptions::default();
        assert_eq!(
            intl.format_percent(0.256, &options, "en-US").unwrap().as_deref(),
            Some("26%")
        );
        assert_eq!(
            intl.format_percent(0.5, &options, "de-DE").unwrap().as_deref(),
            Some("50\u{00A0}%")
        );
        assert_eq!(
            intl.format_percent(-0.125, &options.clone().with_fraction_digits(1, 1), "en-US")
                .unwrap()
                .as_deref(),
            Some("-12.5%")
        );
    }

    #[test]
    fn test_currency_formatting() {
        let intl = IntlFormatter::new();
        let options = NumberFormatOptions::default();
        assert_eq!(
            intl.format_currency(1234.5, &options, "en-US", "USD").unwrap().as_deref(),
            Some("$1,234.50")
        );
        assert_eq!(
            intl.format_currency(-5, &options, "en-US", "usd").unwrap().as_deref(),
            Some("-$5.00")
        );
        assert_eq!(
            intl.format_currency(1234.5, &options, "en-US", "JPY").unwrap().as_deref(),
            Some("\u{00a5}1,235")
        );
        assert_eq!(
            intl.format_currency(
                1234.5,
                &options.clone().with_currency_display(CurrencyDisplay::Code),
                "en-US",
                "EUR"
            )
            .unwrap()
            .as_deref(),
            Some("EUR\u{00A0}1,234.50")
        );
        assert_eq!(
            intl.format_currency(
                1,
                &options
                    .clone()
                    .with_currency_display(CurrencyDisplay::Name)
                    .with_fraction_digits(0, 0),
                "en-US",
                "USD"
            )
            .unwrap()
            .as_deref(),
            Some("1 US dollar")
        );
    }

    #[cfg(not(feature = "cldr"))]
    #[test]
    fn test_currency_suffix_locales() {
        let intl = IntlFormatter::new();
        assert_eq!(
            intl.format_currency(1234.5, &NumberFormatOptions::default(), "de-DE", "EUR")
                .unwrap()
                .as_deref(),
            Some("1.234,50\u{00A0}\u{20ac}")
        );
    }

    #[cfg(not(feature = "cldr"))]
    #[test]
    fn test_date_inputs() {
        let intl = IntlFormatter::new();
        let options = DateFormatOptions::date(DateLength::Short);

        let text = intl.format_date("2026-01-17", &options, "en-US", "America/New_York").unwrap();
        assert_eq!(text.as_deref(), Some("01/17/26"));

        let text = intl
            .format_date("2026-01-17T02:00:00Z", &options, "en-US", "America/New_York")
            .unwrap();
        assert_eq!(text.as_deref(), Some("01/16/26"));

        let millis = 1_768_617_600_000_i64;
        let text = intl
            .format_date(millis, &options.clone().with_time_zone("UTC"), "en-GB", "Asia/Tokyo")
            .unwrap();
        assert_eq!(text.as_deref(), Some("17/01/26"));
    }

    #[test]
    fn test_date_errors() {
        let intl = IntlFormatter::new();
        let options = DateFormatOptions::default();
        assert!(intl.format_date("yesterday", &options, "en-US", "UTC").unwrap_err().is_format());
        assert!(intl
            .format_date("2026-01-17", &options, "en-US", "Mars/Olympus")
            .unwrap_err()
            .is_format());
    }

    #[test]
    fn test_parse_number() {
        let intl = IntlFormatter::new();
        assert_eq!(intl.parse_number("1.234,5", "de-DE").unwrap(), Some(1234.5));
        assert_eq!(intl.parse_number("1.234,5", "en-US").unwrap(), None);
    }
}
