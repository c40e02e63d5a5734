//! ISO 4217 currency data.

use std::fmt;

/// Currency code (ISO 4217), stored upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Create a new currency code.
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_uppercase())
    }

    /// US Dollar
    pub fn usd() -> Self {
        Self::new("USD")
    }

    /// Euro
    pub fn eur() -> Self {
        Self::new("EUR")
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Symbol for well-known currencies, or the code itself.
    pub fn symbol(&self) -> &str {
        match self.0.as_str() {
            "USD" => "$",
            "EUR" => "\u{20ac}",
            "GBP" => "\u{00a3}",
            "JPY" | "CNY" => "\u{00a5}",
            "KRW" => "\u{20a9}",
            "INR" => "\u{20b9}",
            "RUB" => "\u{20bd}",
            "ILS" => "\u{20aa}",
            "TRY" => "\u{20ba}",
            "BRL" => "R$",
            "CAD" => "CA$",
            "AUD" => "A$",
            "MXN" => "MX$",
            "CHF" => "CHF",
            other => other,
        }
    }

    /// Number of minor unit digits (cents and the like).
    pub fn minor_units(&self) -> u8 {
        match self.0.as_str() {
            "JPY" | "KRW" | "CLP" | "ISK" | "VND" | "PYG" | "UGX" | "XAF" | "XOF" => 0,
            "BHD" | "KWD" | "OMR" | "JOD" | "TND" | "LYD" | "IQD" => 3,
            _ => 2,
        }
    }

    /// English display name, singular or plural.
    pub fn display_name(&self, plural: bool) -> String {
        let (one, other) = match self.0.as_str() {
            "USD" => ("US dollar", "US dollars"),
            "EUR" => ("euro", "euros"),
            "GBP" => ("British pound", "British pounds"),
            "JPY" => ("Japanese yen", "Japanese yen"),
            "CNY" => ("Chinese yuan", "Chinese yuan"),
            "KRW" => ("South Korean won", "South Korean won"),
            "INR" => ("Indian rupee", "Indian rupees"),
            "RUB" => ("Russian ruble", "Russian rubles"),
            "BRL" => ("Brazilian real", "Brazilian reals"),
            "CAD" => ("Canadian dollar", "Canadian dollars"),
            "AUD" => ("Australian dollar", "Australian dollars"),
            "MXN" => ("Mexican peso", "Mexican pesos"),
            "CHF" => ("Swiss franc", "Swiss francs"),
            other => return other.to_string(),
        };
        if plural { other } else { one }.to_string()
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_symbols() {
        assert_eq!(CurrencyCode::usd().symbol(), "$");
        assert_eq!(CurrencyCode::eur().symbol(), "\u{20ac}");
        assert_eq!(CurrencyCode::new("gbp").symbol(), "\u{00a3}");
        assert_eq!(CurrencyCode::new("XYZ").symbol(), "XYZ");
    }

    #[test]
    fn test_minor_units() {
        assert_eq!(CurrencyCode::usd().minor_units(), 2);
        assert_eq!(CurrencyCode::new("JPY").minor_units(), 0);
        assert_eq!(CurrencyCode::new("KWD").minor_units(), 3);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(CurrencyCode::usd().display_name(false), "US dollar");
        assert_eq!(CurrencyCode::usd().display_name(true), "US dollars");
        assert_eq!(CurrencyCode::new("abc").display_name(true), "ABC");
        assert_eq!(CurrencyCode::new(" eur ").to_string(), "EUR");
    }
}
