//! Built-in number symbol tables for common locales.

use crate::locale::language_of;

/// Where the currency marker goes relative to the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyPosition {
    /// `$1,234.50`
    Prefix,
    /// `€ 1.234,50`
    PrefixSpaced,
    /// `1.234,50 €`
    Suffix,
}

/// Separators and affix placement for one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleSymbols {
    /// Decimal separator.
    pub decimal: char,
    /// Grouping (thousands) separator.
    pub group: char,
    /// Separator between a number and a trailing percent sign, if any.
    pub percent_space: Option<char>,
    /// Currency symbol placement.
    pub currency_position: CurrencyPosition,
}

impl Default for LocaleSymbols {
    fn default() -> Self {
        Self {
            decimal: '.',
            group: ',',
            percent_space: None,
            currency_position: CurrencyPosition::Prefix,
        }
    }
}

impl LocaleSymbols {
    /// Look up the symbols for a locale tag.
    ///
    /// - `en-US`, `ja-JP`, `zh-CN`, `ko-KR`: `1,234.56`
    /// - `de-DE`, `es-ES`, `it-IT`, `pt-BR`: `1.234,56`
    /// - `fr-FR`, `sv-SE`, `ru-RU`: `1 234,56` (narrow no-break space)
    pub fn for_locale(locale: &str) -> Self {
        let lang = language_of(locale);
        let lang = lang.as_str();

        let comma_decimal = matches!(
            lang,
            "de" | "fr" | "es" | "it" | "pt" | "nl" | "da" | "fi" | "nb" | "nn" | "sv"
                | "pl" | "cs" | "sk" | "hu" | "ro" | "bg" | "hr" | "sl" | "sr" | "uk" | "ru"
                | "el" | "tr" | "vi" | "id" | "ca" | "gl" | "eu" | "et" | "lv" | "lt"
        );
        if !comma_decimal {
            return Self::default();
        }

        let space_thousands = matches!(
            lang,
            "fr" | "fi" | "sv" | "nb" | "nn" | "pl" | "cs" | "sk" | "ru" | "uk" | "bg"
        );
        let group = if space_thousands { '\u{202F}' } else { '.' };

        let percent_space = match lang {
            "fr" => Some('\u{202F}'),
            "de" | "es" | "sv" | "nb" | "nn" | "fi" | "da" | "cs" | "sk" | "ru" | "uk" | "pl"
            | "bg" => Some('\u{00A0}'),
            _ => None,
        };

        let currency_position = match lang {
            "nl" | "pt" | "id" => CurrencyPosition::PrefixSpaced,
            "tr" => CurrencyPosition::Prefix,
            _ => CurrencyPosition::Suffix,
        };

        Self {
            decimal: ',',
            group,
            percent_space,
            currency_position,
        }
    }

    /// True when the group separator is a kind of space.
    pub fn group_is_space(&self) -> bool {
        self.group.is_whitespace() || self.group == '\u{202F}'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_symbols() {
        let symbols = LocaleSymbols::for_locale("en-US");
        assert_eq!(symbols.decimal, '.');
        assert_eq!(symbols.group, ',');
        assert_eq!(symbols.percent_space, None);
        assert_eq!(symbols.currency_position, CurrencyPosition::Prefix);
    }

    #[test]
    fn test_european_symbols() {
        let german = LocaleSymbols::for_locale("de-DE");
        assert_eq!((german.group, german.decimal), ('.', ','));
        assert_eq!(german.currency_position, CurrencyPosition::Suffix);

        let french = LocaleSymbols::for_locale("fr_FR");
        assert_eq!(french.group, '\u{202F}');
        assert!(french.group_is_space());

        let dutch = LocaleSymbols::for_locale("nl");
        assert_eq!(dutch.currency_position, CurrencyPosition::PrefixSpaced);
    }

    #[test]
    fn test_unknown_locale_uses_defaults() {
        assert_eq!(LocaleSymbols::for_locale("xx-YY"), LocaleSymbols::default());
        assert_eq!(LocaleSymbols::for_locale(""), LocaleSymbols::default());
    }
}
