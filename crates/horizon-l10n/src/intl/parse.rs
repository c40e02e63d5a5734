//! Localized number input parsing.

use regex::Regex;

use super::symbols::LocaleSymbols;
use crate::error::{L10nError, Result};

/// Parses user-entered numbers written with a locale's separators.
///
/// Accepts an optional sign, either correctly grouped integer digits or plain
/// digits, and an optional fraction after the locale's decimal separator.
#[derive(Debug, Clone)]
pub struct NumberParser {
    symbols: LocaleSymbols,
    pattern: Regex,
}

impl NumberParser {
    /// Build a parser for a locale.
    pub fn for_locale(locale: &str) -> Result<Self> {
        let symbols = LocaleSymbols::for_locale(locale);

        let group = if symbols.group_is_space() {
            format!("[{} \u{00A0}\u{202F}]", regex::escape(&symbols.group.to_string()))
        } else {
            regex::escape(&symbols.group.to_string())
        };
        let decimal = regex::escape(&symbols.decimal.to_string());
        let pattern =
            format!(r"^[+-]?(?:[0-9]{{1,3}}(?:{group}[0-9]{{3}})+|[0-9]+)(?:{decimal}[0-9]+)?$");

        let pattern = Regex::new(&pattern).map_err(|e| L10nError::format(e.to_string()))?;
        Ok(Self { symbols, pattern })
    }

    /// Parse `text`, returning `None` when it is not a well-formed number.
    pub fn parse(&self, text: &str) -> Option<f64> {
        let text = text.trim();
        if !self.pattern.is_match(text) {
            return None;
        }

        let normalized: String = text
            .chars()
            .filter_map(|c| {
                if c == self.symbols.decimal {
                    Some('.')
                } else if c.is_ascii_digit() || c == '-' || c == '+' {
                    Some(c)
                } else {
                    None
                }
            })
            .collect();
        normalized.parse().ok()
    }
}
