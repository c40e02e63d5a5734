//! Locale-aware digit formatting.
//!
//! Rounding is done on the shortest decimal representation of the value, half
//! away from zero, so `1.005` with two fraction digits gives `1.01`.

use super::options::DigitRange;
use super::symbols::LocaleSymbols;

/// A rounded and localized number without sign or affixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedDigits {
    /// The value was negative and did not round to zero.
    pub negative: bool,
    /// Localized digits with separators.
    pub digits: String,
    /// True when the rounded value is exactly one (for plural display names).
    pub is_one: bool,
}

/// Rounded decimal digits split into integer and fraction parts.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RoundedDecimal {
    integer: String,
    fraction: String,
}

impl RoundedDecimal {
    fn round(value: f64, range: DigitRange) -> Self {
        let repr = format!("{}", value.abs());
        let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
        let max = usize::from(range.maximum_fraction);

        let kept_fraction = frac_part.len().min(max);
        let mut digits: Vec<u8> = int_part
            .bytes()
            .chain(frac_part.bytes().take(kept_fraction))
            .map(|b| b - b'0')
            .collect();

        let round_up = frac_part.as_bytes().get(max).is_some_and(|d| *d >= b'5');
        if round_up {
            let mut carry = true;
            for digit in digits.iter_mut().rev() {
                if *digit == 9 {
                    *digit = 0;
                } else {
                    *digit += 1;
                    carry = false;
                    break;
                }
            }
            if carry {
                digits.insert(0, 1);
            }
        }

        let split = digits.len() - kept_fraction;
        let to_string = |slice: &[u8]| slice.iter().map(|d| char::from(b'0' + d)).collect::<String>();
        let mut integer = to_string(&digits[..split]);
        let mut fraction = to_string(&digits[split..]);

        let min = usize::from(range.minimum_fraction);
        while fraction.len() > min && fraction.ends_with('0') {
            fraction.pop();
        }
        while fraction.len() < min {
            fraction.push('0');
        }

        let trimmed = integer.trim_start_matches('0');
        integer = if trimmed.is_empty() { "0".to_string() } else { trimmed.to_string() };
        let min_int = usize::from(range.minimum_integer);
        if integer.len() < min_int {
            integer = format!("{}{}", "0".repeat(min_int - integer.len()), integer);
        }

        Self { integer, fraction }
    }

    fn is_zero(&self) -> bool {
        self.integer.bytes().chain(self.fraction.bytes()).all(|b| b == b'0')
    }

    fn is_one(&self) -> bool {
        self.integer.trim_start_matches('0') == "1" && self.fraction.is_empty()
    }
}

/// Formats numbers for one locale.
///
/// Instances are cheap and built per call; nothing formatted is cached.
pub struct NumberFormatter {
    locale: String,
    symbols: LocaleSymbols,
    #[cfg(feature = "cldr")]
    decimal: Option<icu::decimal::DecimalFormatter>,
}

impl NumberFormatter {
    /// Create a number formatter for a specific locale.
    ///
    /// # Arguments
    ///
    /// * `locale` - A BCP 47 locale identifier (e.g., "en-US", "de-DE")
    pub fn with_locale(locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
            symbols: LocaleSymbols::for_locale(locale),
            #[cfg(feature = "cldr")]
            decimal: Self::icu_formatter(locale),
        }
    }

    #[cfg(feature = "cldr")]
    fn icu_formatter(locale: &str) -> Option<icu::decimal::DecimalFormatter> {
        use icu::decimal::DecimalFormatter;
        use icu::locale::Locale;

        let locale: Locale = locale.parse().ok()?;
        DecimalFormatter::try_new(locale.into(), Default::default()).ok()
    }

    /// Symbols used by the table-driven path.
    pub fn symbols(&self) -> &LocaleSymbols {
        &self.symbols
    }

    /// Get the locale identifier.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Format an integer with grouping.
    pub fn format_integer(&self, value: i64) -> String {
        let digits = self.format_digits(
            value as f64,
            DigitRange {
                minimum_integer: 1,
                minimum_fraction: 0,
                maximum_fraction: 0,
            },
            true,
        );
        if digits.negative {
            format!("-{}", digits.digits)
        } else {
            digits.digits
        }
    }

    /// Round `value` to `range` and localize its digits.
    ///
    /// `value` must be finite.
    pub fn format_digits(&self, value: f64, range: DigitRange, grouping: bool) -> FormattedDigits {
        let rounded = RoundedDecimal::round(value, range);
        let negative = value.is_sign_negative() && !rounded.is_zero();
        let is_one = rounded.is_one();

        #[cfg(feature = "cldr")]
        if grouping && range.minimum_integer <= 1 {
            if let Some(digits) = self.format_icu(&rounded) {
                return FormattedDigits {
                    negative,
                    digits,
                    is_one,
                };
            }
        }

        let integer = if grouping {
            self.format_with_thousands(&rounded.integer)
        } else {
            rounded.integer.clone()
        };
        let digits = if rounded.fraction.is_empty() {
            integer
        } else {
            format!("{}{}{}", integer, self.symbols.decimal, rounded.fraction)
        };

        FormattedDigits {
            negative,
            digits,
            is_one,
        }
    }

    #[cfg(feature = "cldr")]
    fn format_icu(&self, rounded: &RoundedDecimal) -> Option<String> {
        use icu::decimal::input::Decimal;

        let formatter = self.decimal.as_ref()?;
        let scaled: i64 = format!("{}{}", rounded.integer, rounded.fraction).parse().ok()?;
        let scale = i16::try_from(rounded.fraction.len()).ok()?;
        let mut decimal = Decimal::from(scaled);
        decimal.multiply_pow10(-scale);
        Some(formatter.format(&decimal).to_string())
    }

    /// Add thousands separators to a digit string.
    fn format_with_thousands(&self, s: &str) -> String {
        let chars: Vec<char> = s.chars().collect();
        let len = chars.len();

        if len <= 3 {
            return s.to_string();
        }

        let mut result = String::with_capacity(len + len / 3);
        for (i, c) in chars.iter().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                result.push(self.symbols.group);
            }
            result.push(*c);
        }
        result
    }
}
