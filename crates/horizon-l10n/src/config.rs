//! Configuration for the localization services.
//!
//! Configuration can be built in code with the `with_*` methods or loaded
//! from a TOML or JSON document. Every field has a default, so an empty
//! document is a valid configuration.
//!
//! ```toml
//! default_locale = "en-US"
//! default_currency = "USD"
//! default_timezone = "America/New_York"
//! strict = true
//! missing_key = { fallback = ["en-US"] }
//! merge = "deep"
//!
//! [[supported_locales]]
//! language = "en-US"
//! currency = "USD"
//!
//! [[supported_locales]]
//! language = "fr-FR"
//! currency = "EUR"
//! timezone = "Europe/Paris"
//!
//! [storage]
//! type = "file"
//!
//! [[providers]]
//! type = "file"
//! dir = "assets/i18n"
//! prefix = "locale-"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{L10nError, Result};
use crate::locale::normalize_tag;

/// What key resolution returns when a key is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MissingKeyPolicy {
    /// Return the key itself.
    #[default]
    Key,
    /// Return a fixed string.
    Default(String),
    /// Look the key up in these languages, in order, then return the key.
    Fallback(Vec<String>),
}

/// How data from several providers is combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Union of keys at every level; later providers win on leaf collisions.
    #[default]
    Deep,
    /// Union of top-level keys; later providers replace whole subtrees.
    Shallow,
}

/// What happens when a provider fails during a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProviderFailurePolicy {
    /// Log the failure and continue with the providers that succeeded.
    #[default]
    FailSoft,
    /// Fail the whole load; previously loaded data is retained.
    Strict,
}

/// Whether providers are awaited one after another or all at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProviderConcurrency {
    /// Await each provider before invoking the next.
    Sequential,
    /// Invoke all providers and await them together.
    #[default]
    Concurrent,
}

/// Where the selected locale state is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageStrategy {
    /// Process-local memory (lost at exit).
    #[default]
    Memory,
    /// A JSON document on disk. Without a path the platform config directory is used.
    File {
        #[serde(default)]
        path: Option<PathBuf>,
    },
    /// No persistence.
    Disabled,
}

/// A translation source declared in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// `<dir>/<prefix><language>.json` on the local filesystem.
    File {
        dir: PathBuf,
        #[serde(default)]
        prefix: String,
    },
    /// `<base_url>/<prefix><language>.json` over HTTP.
    Http {
        base_url: String,
        #[serde(default)]
        prefix: String,
    },
}

/// A locale the application supports, with its preferred currency and timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleEntry {
    /// Language tag (e.g. "fr-FR").
    pub language: String,
    /// Currency used when this locale is selected.
    #[serde(default)]
    pub currency: Option<String>,
    /// Timezone used when this locale is selected.
    #[serde(default)]
    pub timezone: Option<String>,
}

impl LocaleEntry {
    /// Create an entry with only a language tag.
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            currency: None,
            timezone: None,
        }
    }

    /// Set the entry's currency.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Set the entry's timezone.
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }
}

/// Localization configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct L10nConfig {
    /// Initial language and formatting locale.
    pub default_locale: String,
    /// Initial currency.
    pub default_currency: String,
    /// Initial timezone.
    pub default_timezone: String,
    /// Supported locales. Empty means any well-formed tag is accepted.
    pub supported_locales: Vec<LocaleEntry>,
    /// Currencies accepted in strict mode besides those of supported locales.
    pub extra_currencies: Vec<String>,
    /// Reject values outside the supported sets.
    pub strict: bool,
    /// Pick the initial language from the system locale when nothing is stored.
    pub negotiate: bool,
    /// Missing key behavior.
    pub missing_key: MissingKeyPolicy,
    /// Provider merge strategy.
    pub merge: MergeStrategy,
    /// Provider failure policy.
    pub provider_failure: ProviderFailurePolicy,
    /// Provider invocation mode.
    pub concurrency: ProviderConcurrency,
    /// Log missing keys at `warn` instead of `debug`.
    pub warn_missing: bool,
    /// Log placeholders that have no matching parameter.
    pub warn_unmatched_params: bool,
    /// Persistence backend.
    pub storage: StorageStrategy,
    /// Prefix for storage keys.
    pub storage_prefix: String,
    /// Translation sources declared in configuration.
    pub providers: Vec<ProviderConfig>,
}

impl Default for L10nConfig {
    fn default() -> Self {
        Self {
            default_locale: "en-US".to_string(),
            default_currency: "USD".to_string(),
            default_timezone: "UTC".to_string(),
            supported_locales: Vec::new(),
            extra_currencies: Vec::new(),
            strict: false,
            negotiate: false,
            missing_key: MissingKeyPolicy::default(),
            merge: MergeStrategy::default(),
            provider_failure: ProviderFailurePolicy::default(),
            concurrency: ProviderConcurrency::default(),
            warn_missing: false,
            warn_unmatched_params: false,
            storage: StorageStrategy::default(),
            storage_prefix: "horizon_l10n.".to_string(),
            providers: Vec::new(),
        }
    }
}

impl L10nConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source).map_err(|e| L10nError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document.
    pub fn from_json_str(source: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(source).map_err(|e| L10nError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML or JSON file, chosen by extension (`.json` is JSON, anything else TOML).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| L10nError::io(path, e))?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&source),
            _ => Self::from_toml_str(&source),
        }
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<()> {
        if self.default_locale.trim().is_empty() {
            return Err(L10nError::config("default_locale must not be empty"));
        }
        if !is_currency_code(&self.default_currency) {
            return Err(L10nError::config(format!(
                "default_currency '{}' is not an ISO 4217 code",
                self.default_currency
            )));
        }
        if self.default_timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(L10nError::config(format!(
                "default_timezone '{}' is not an IANA timezone",
                self.default_timezone
            )));
        }
        if self.strict
            && !self.supported_locales.is_empty()
            && !self.is_supported_locale(&self.default_locale)
        {
            return Err(L10nError::config(format!(
                "default_locale '{}' is not among supported_locales",
                self.default_locale
            )));
        }
        Ok(())
    }

    /// Set the default locale.
    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = locale.into();
        self
    }

    /// Set the default currency.
    pub fn with_default_currency(mut self, currency: impl Into<String>) -> Self {
        self.default_currency = currency.into();
        self
    }

    /// Set the default timezone.
    pub fn with_default_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.default_timezone = timezone.into();
        self
    }

    /// Add a supported locale.
    pub fn with_locale(mut self, entry: LocaleEntry) -> Self {
        self.supported_locales.push(entry);
        self
    }

    /// Enable or disable strict validation.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Enable or disable system locale negotiation at init.
    pub fn with_negotiation(mut self, negotiate: bool) -> Self {
        self.negotiate = negotiate;
        self
    }

    /// Set the missing key policy.
    pub fn with_missing_key(mut self, policy: MissingKeyPolicy) -> Self {
        self.missing_key = policy;
        self
    }

    /// Set the merge strategy.
    pub fn with_merge(mut self, merge: MergeStrategy) -> Self {
        self.merge = merge;
        self
    }

    /// Set the provider failure policy.
    pub fn with_provider_failure(mut self, policy: ProviderFailurePolicy) -> Self {
        self.provider_failure = policy;
        self
    }

    /// Set the provider invocation mode.
    pub fn with_concurrency(mut self, concurrency: ProviderConcurrency) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the storage backend.
    pub fn with_storage(mut self, storage: StorageStrategy) -> Self {
        self.storage = storage;
        self
    }

    /// Declare a provider.
    pub fn with_provider(mut self, provider: ProviderConfig) -> Self {
        self.providers.push(provider);
        self
    }

    /// Log unmatched interpolation placeholders.
    pub fn with_warn_unmatched_params(mut self, warn: bool) -> Self {
        self.warn_unmatched_params = warn;
        self
    }

    /// Returns true if `tag` is one of the supported locales (or any tag when none are listed).
    pub fn is_supported_locale(&self, tag: &str) -> bool {
        if self.supported_locales.is_empty() {
            return true;
        }
        self.find_locale(tag).is_some()
    }

    /// Look up the supported locale entry matching `tag`.
    pub fn find_locale(&self, tag: &str) -> Option<&LocaleEntry> {
        let wanted = normalize_tag(tag);
        self.supported_locales
            .iter()
            .find(|entry| normalize_tag(&entry.language).eq_ignore_ascii_case(&wanted))
    }

    /// Tags of all supported locales.
    pub fn supported_languages(&self) -> Vec<String> {
        self.supported_locales
            .iter()
            .map(|entry| entry.language.clone())
            .collect()
    }

    /// Returns true if `code` is accepted as a currency in strict mode.
    pub fn is_supported_currency(&self, code: &str) -> bool {
        self.default_currency.eq_ignore_ascii_case(code)
            || self
                .extra_currencies
                .iter()
                .any(|c| c.eq_ignore_ascii_case(code))
            || self
                .supported_locales
                .iter()
                .filter_map(|entry| entry.currency.as_deref())
                .any(|c| c.eq_ignore_ascii_case(code))
    }

    /// Languages consulted when a key is missing.
    pub fn fallback_languages(&self) -> &[String] {
        match &self.missing_key {
            MissingKeyPolicy::Fallback(languages) => languages,
            _ => &[],
        }
    }
}

/// Returns true if `code` looks like an ISO 4217 code (three ASCII letters).
pub fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = L10nConfig::from_toml_str("").unwrap();
        assert_eq!(config, L10nConfig::default());
        assert_eq!(config.default_locale, "en-US");
        assert_eq!(config.merge, MergeStrategy::Deep);
        assert_eq!(config.provider_failure, ProviderFailurePolicy::FailSoft);
    }

    #[test]
    fn test_toml_document() {
        let config = L10nConfig::from_toml_str(
            r#"
            default_locale = "fr-FR"
            default_currency = "EUR"
            default_timezone = "Europe/Paris"
            strict = true
            missing_key = { fallback = ["en-US"] }
            merge = "shallow"
            provider_failure = "strict"

            [[supported_locales]]
            language = "en-US"
            currency = "USD"

            [[supported_locales]]
            language = "fr-FR"
            currency = "EUR"
            timezone = "Europe/Paris"

            [storage]
            type = "file"
            path = "/tmp/l10n.json"

            [[providers]]
            type = "file"
            dir = "assets/i18n"
            prefix = "locale-"

            [[providers]]
            type = "http"
            base_url = "https://cdn.example.com/i18n"
            "#,
        )
        .unwrap();

        assert_eq!(config.default_locale, "fr-FR");
        assert!(config.strict);
        assert_eq!(
            config.missing_key,
            MissingKeyPolicy::Fallback(vec!["en-US".to_string()])
        );
        assert_eq!(config.merge, MergeStrategy::Shallow);
        assert_eq!(config.supported_locales.len(), 2);
        assert_eq!(
            config.storage,
            StorageStrategy::File {
                path: Some(PathBuf::from("/tmp/l10n.json"))
            }
        );
        assert_eq!(config.providers.len(), 2);
        assert!(matches!(
            &config.providers[1],
            ProviderConfig::Http { prefix, .. } if prefix.is_empty()
        ));
        assert_eq!(config.fallback_languages(), ["en-US".to_string()]);
    }

    #[test]
    fn test_json_document() {
        let config = L10nConfig::from_json_str(
            r#"{ "default_locale": "de-DE", "missing_key": { "default": "??" }, "storage": { "type": "disabled" } }"#,
        )
        .unwrap();
        assert_eq!(config.default_locale, "de-DE");
        assert_eq!(config.missing_key, MissingKeyPolicy::Default("??".into()));
        assert_eq!(config.storage, StorageStrategy::Disabled);
    }

    #[test]
    fn test_rejects_bad_defaults() {
        assert!(L10nConfig::from_toml_str(r#"default_currency = "DOLLARS""#).is_err());
        assert!(L10nConfig::from_toml_str(r#"default_timezone = "Mars/Olympus""#).is_err());
        assert!(L10nConfig::from_toml_str(r#"default_locale = "  ""#).is_err());

        let err = L10nConfig::from_toml_str(
            r#"
            default_locale = "it-IT"
            strict = true
            [[supported_locales]]
            language = "en-US"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("it-IT"));
    }

    #[test]
    fn test_supported_lookups() {
        let config = L10nConfig::new()
            .with_locale(LocaleEntry::new("en-US").with_currency("USD"))
            .with_locale(LocaleEntry::new("fr-FR").with_currency("EUR"));

        assert!(config.is_supported_locale("fr_FR"));
        assert!(config.is_supported_locale("EN-us"));
        assert!(!config.is_supported_locale("de-DE"));
        assert!(config.is_supported_currency("eur"));
        assert!(!config.is_supported_currency("JPY"));
        assert_eq!(config.supported_languages(), vec!["en-US", "fr-FR"]);
    }

    #[test]
    fn test_any_locale_without_list() {
        assert!(L10nConfig::new().is_supported_locale("tlh"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("l10n.json");
        std::fs::write(&path, r#"{ "default_currency": "JPY" }"#).unwrap();
        assert_eq!(L10nConfig::load(&path).unwrap().default_currency, "JPY");

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            L10nConfig::load(&missing),
            Err(L10nError::Io { .. })
        ));
    }
}
