//! The locale state coordinator.
//!
//! [`L10nService`] owns the four locale dimensions (language, default
//! formatting locale, currency, timezone), the translation cache and the
//! change bus. Every state change goes through its setters, which validate,
//! persist and notify.
//!
//! # Example
//!
//! ```no_run
//! use horizon_l10n::prelude::*;
//!
//! # async fn run() -> horizon_l10n::Result<()> {
//! let config = L10nConfig::new()
//!     .with_locale(LocaleEntry::new("en-US").with_currency("USD"))
//!     .with_locale(LocaleEntry::new("fr-FR").with_currency("EUR"));
//!
//! let service = L10nService::builder(config)
//!     .provider(
//!         StaticProvider::new()
//!             .with_language("en-US", TranslationData::new().with("greeting", "Hello {name}"))
//!             .with_language("fr-FR", TranslationData::new().with("greeting", "Bonjour {name}")),
//!     )
//!     .build()?;
//! service.init().await?;
//!
//! service.set_language("fr-FR").await?;
//! let params = Params::from([("name", "Ana")]);
//! assert_eq!(service.translate_with("greeting", &params), "Bonjour Ana");
//! # Ok(())
//! # }
//! ```

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono_tz::Tz;
use horizon_l10n_core::logging::{span_names, targets};
use horizon_l10n_core::{Property, ReadOnlyProperty};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::Instrument;

use crate::bus::{ChangeBus, ChangeNotification};
use crate::config::{L10nConfig, LocaleEntry, ProviderConfig, is_currency_code};
use crate::error::{Dimension, L10nError, Result};
use crate::intl::{
    Collator, DateFormatOptions, DateInput, FormatInput, IntlFormatter, NumberFormatOptions,
    Sensitivity,
};
use crate::locale::{SystemLocale, TextDirection, is_well_formed, language_of, negotiate, normalize_tag};
use crate::storage::{self, LocaleStorage, NoStorage};
use crate::translation::{
    DefaultTranslationHandler, FileProvider, KeyResolver, Params, TranslationData,
    TranslationHandler, TranslationLoader, TranslationProvider, TranslationStore,
};

type SystemLocales = Arc<dyn Fn() -> Vec<String> + Send + Sync>;

/// Snapshot of the four locale dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleState {
    pub language: String,
    pub default_locale: String,
    pub currency: String,
    pub timezone: String,
}

/// Values for [`L10nService::set_locale`]. Unset fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleSelection {
    pub language: Option<String>,
    pub default_locale: Option<String>,
    pub currency: Option<String>,
    pub timezone: Option<String>,
}

impl LocaleSelection {
    /// An empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = Some(locale.into());
        self
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    /// Returns true if no dimension is selected.
    pub fn is_empty(&self) -> bool {
        self.language.is_none()
            && self.default_locale.is_none()
            && self.currency.is_none()
            && self.timezone.is_none()
    }
}

impl From<&LocaleEntry> for LocaleSelection {
    fn from(entry: &LocaleEntry) -> Self {
        Self {
            language: Some(entry.language.clone()),
            default_locale: None,
            currency: entry.currency.clone(),
            timezone: entry.timezone.clone(),
        }
    }
}

/// Locale state coordinator.
///
/// Created once by [`L10nBuilder::build`] and shared as `Arc<L10nService>`.
/// Translation loads are the only suspension points; locks are never held
/// across them or while subscribers run.
pub struct L10nService {
    config: L10nConfig,
    language: Property<String>,
    default_locale: Property<String>,
    currency: Property<String>,
    timezone: Property<String>,
    loader: TranslationLoader,
    store: TranslationStore,
    resolver: KeyResolver,
    storage: Arc<dyn LocaleStorage>,
    system_locales: SystemLocales,
    bus: ChangeBus,
    intl: IntlFormatter,
    /// Provider sub-paths loaded through [`L10nService::load_module`].
    modules: Mutex<Vec<String>>,
    /// Ticket of the most recent language request.
    latest_request: Mutex<u64>,
}

impl fmt::Debug for L10nService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("L10nService")
            .field("state", &self.state())
            .field("loader", &self.loader)
            .field("loaded", &self.store.languages())
            .field("bus", &self.bus)
            .finish_non_exhaustive()
    }
}

impl L10nService {
    /// Start building a service from configuration.
    pub fn builder(config: L10nConfig) -> L10nBuilder {
        L10nBuilder::new(config)
    }

    /// Build a service with the providers declared in `config` only.
    pub fn new(config: L10nConfig) -> Result<Arc<Self>> {
        Self::builder(config).build()
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Select the initial state, load its translations, commit and persist it.
    ///
    /// Each dimension comes from storage when a valid value is stored there,
    /// otherwise from negotiation against the system locales (language only,
    /// when enabled), otherwise from the supported locale entry or the
    /// configured defaults. Calling `init` again re-runs the selection.
    ///
    /// If the translations for the selected language cannot be loaded, the
    /// selected state is still committed and persisted and the load error is
    /// returned; [`L10nService::reload`] retries the load later.
    pub async fn init(&self) -> Result<()> {
        let span = tracing::info_span!(target: targets::SERVICE, span_names::INIT);
        async move {
            let language = self.initial_language();
            let entry = self.config.find_locale(&language).cloned();

            let default_locale = self.initial_value(Dimension::DefaultLocale, || language.clone());
            let currency = self.initial_value(Dimension::Currency, || {
                entry
                    .as_ref()
                    .and_then(|e| e.currency.as_deref())
                    .unwrap_or(self.config.default_currency.as_str())
                    .trim()
                    .to_ascii_uppercase()
            });
            let timezone = self.initial_value(Dimension::Timezone, || {
                entry
                    .as_ref()
                    .and_then(|e| e.timezone.as_deref())
                    .unwrap_or(self.config.default_timezone.as_str())
                    .trim()
                    .to_string()
            });

            let loaded = self.switch_language(language.clone(), true).await;
            if let Err(error) = &loaded {
                tracing::warn!(
                    target: targets::SERVICE,
                    %language,
                    %error,
                    "initial translations unavailable; keeping the selected locale"
                );
                self.commit(Dimension::Language, language);
            }
            self.commit(Dimension::DefaultLocale, default_locale);
            self.commit(Dimension::Currency, currency);
            self.commit(Dimension::Timezone, timezone);

            for dimension in Dimension::ALL {
                self.persist(dimension, &self.value(dimension));
            }
            loaded?;
            tracing::info!(target: targets::SERVICE, state = ?self.state(), "localization initialized");
            Ok(())
        }
        .instrument(span)
        .await
    }

    fn initial_language(&self) -> String {
        self.initial_value(Dimension::Language, || {
            if self.config.negotiate {
                let requested = (self.system_locales)();
                let supported = self.config.supported_languages();
                let negotiated = if supported.is_empty() {
                    requested
                        .iter()
                        .map(|tag| normalize_tag(tag))
                        .find(|tag| is_well_formed(tag))
                } else {
                    Some(negotiate(&requested, &supported, &self.config.default_locale))
                };
                if let Some(language) = negotiated {
                    tracing::debug!(target: targets::SERVICE, ?requested, %language, "negotiated language");
                    return normalize_tag(&language);
                }
            }
            normalize_tag(&self.config.default_locale)
        })
    }

    fn initial_value(&self, dimension: Dimension, fallback: impl FnOnce() -> String) -> String {
        if let Some(stored) = self.stored(dimension) {
            match self.validate(dimension, &stored) {
                Ok(value) => return value,
                Err(error) => {
                    tracing::warn!(target: targets::SERVICE, %error, "ignoring stored locale value");
                }
            }
        }
        fallback()
    }

    // =========================================================================
    // Getters
    // =========================================================================

    /// The current language tag.
    pub fn language(&self) -> String {
        self.language.get()
    }

    /// The default (formatting) locale.
    pub fn default_locale(&self) -> String {
        self.default_locale.get()
    }

    /// The current ISO 4217 currency code.
    pub fn currency(&self) -> String {
        self.currency.get()
    }

    /// The current IANA timezone.
    pub fn timezone(&self) -> String {
        self.timezone.get()
    }

    /// Current value of a dimension.
    pub fn value(&self, dimension: Dimension) -> String {
        self.property(dimension).get()
    }

    /// Read-only view of a dimension's state cell.
    pub fn dimension(&self, dimension: Dimension) -> ReadOnlyProperty<'_, String> {
        ReadOnlyProperty::new(self.property(dimension))
    }

    /// Snapshot of all dimensions.
    pub fn state(&self) -> LocaleState {
        LocaleState {
            language: self.language.get(),
            default_locale: self.default_locale.get(),
            currency: self.currency.get(),
            timezone: self.timezone.get(),
        }
    }

    /// Text direction of the current language.
    pub fn direction(&self) -> TextDirection {
        self.language.with(|language| TextDirection::for_locale(language))
    }

    /// `Accept-Language` header value for outgoing requests.
    ///
    /// Lists the current language, its bare language subtag, then the default
    /// locale and its subtag, without duplicates and with decreasing quality.
    pub fn accept_language(&self) -> String {
        let mut tags: Vec<String> = Vec::with_capacity(4);
        for tag in [self.language.get(), self.default_locale.get()] {
            let bare = language_of(&tag);
            for candidate in [tag, bare] {
                if !candidate.is_empty() && !tags.iter().any(|t| t.eq_ignore_ascii_case(&candidate)) {
                    tags.push(candidate);
                }
            }
        }
        tags.iter()
            .enumerate()
            .map(|(i, tag)| match i {
                0 => tag.clone(),
                _ => format!("{tag};q=0.{}", 10 - i),
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn config(&self) -> &L10nConfig {
        &self.config
    }

    /// The change notification bus.
    pub fn bus(&self) -> &ChangeBus {
        &self.bus
    }

    /// The translation cache.
    pub fn store(&self) -> &TranslationStore {
        &self.store
    }

    pub fn intl(&self) -> &IntlFormatter {
        &self.intl
    }

    // =========================================================================
    // Setters
    // =========================================================================

    /// Check and canonicalize a value for a dimension without applying it.
    ///
    /// Values are trimmed and must not be empty. Tags must be well-formed and
    /// currencies three ASCII letters (upper-cased). In strict mode languages
    /// must be supported locales, currencies supported currencies and
    /// timezones known to the IANA database.
    pub fn validate(&self, dimension: Dimension, value: &str) -> Result<String> {
        let value = value.trim();
        if value.is_empty() {
            return Err(L10nError::validation(dimension, value, "must not be empty"));
        }
        let strict = self.config.strict;

        match dimension {
            Dimension::Language | Dimension::DefaultLocale => {
                let tag = normalize_tag(value);
                if !is_well_formed(&tag) {
                    return Err(L10nError::validation(dimension, value, "not a well-formed locale tag"));
                }
                if !strict || self.config.supported_locales.is_empty() {
                    return Ok(tag);
                }
                self.config
                    .find_locale(&tag)
                    .map(|entry| normalize_tag(&entry.language))
                    .ok_or_else(|| L10nError::validation(dimension, value, "not a supported locale"))
            }
            Dimension::Currency => {
                if !is_currency_code(value) {
                    return Err(L10nError::validation(dimension, value, "not an ISO 4217 currency code"));
                }
                let code = value.to_ascii_uppercase();
                if strict && !self.config.is_supported_currency(&code) {
                    return Err(L10nError::validation(dimension, value, "not a supported currency"));
                }
                Ok(code)
            }
            Dimension::Timezone => {
                if strict && value.parse::<Tz>().is_err() {
                    return Err(L10nError::validation(dimension, value, "not an IANA timezone"));
                }
                Ok(value.to_string())
            }
        }
    }

    fn validated(&self, dimension: Dimension, value: &str) -> Result<String> {
        self.validate(dimension, value).inspect_err(|error| {
            tracing::warn!(target: targets::SERVICE, %error, "rejected locale change");
        })
    }

    /// Switch the language, loading its translations first.
    ///
    /// Resolves to `Ok(true)` once the new language is committed, its
    /// translations are cached and subscribers were notified (language, then
    /// translation loaded). Resolves to `Ok(false)` if the language was
    /// already current or a later request superseded this one. On a load
    /// failure the previous language stays in effect.
    #[tracing::instrument(skip(self), target = "horizon_l10n::service", level = "debug")]
    pub async fn set_language(&self, language: &str) -> Result<bool> {
        let language = self.validated(Dimension::Language, language)?;
        self.switch_language(language, false).await
    }

    /// Set the default (formatting) locale.
    #[tracing::instrument(skip(self), target = "horizon_l10n::service", level = "debug")]
    pub fn set_default_locale(&self, locale: &str) -> Result<bool> {
        let locale = self.validated(Dimension::DefaultLocale, locale)?;
        Ok(self.commit(Dimension::DefaultLocale, locale))
    }

    /// Set the currency. The code is upper-cased.
    #[tracing::instrument(skip(self), target = "horizon_l10n::service", level = "debug")]
    pub fn set_currency(&self, currency: &str) -> Result<bool> {
        let currency = self.validated(Dimension::Currency, currency)?;
        Ok(self.commit(Dimension::Currency, currency))
    }

    /// Set the timezone.
    #[tracing::instrument(skip(self), target = "horizon_l10n::service", level = "debug")]
    pub fn set_timezone(&self, timezone: &str) -> Result<bool> {
        let timezone = self.validated(Dimension::Timezone, timezone)?;
        Ok(self.commit(Dimension::Timezone, timezone))
    }

    /// Apply several dimensions at once: language, then default locale,
    /// currency and timezone.
    ///
    /// All values are validated before any is applied. Returns true if any
    /// dimension changed.
    pub async fn set_locale(&self, selection: LocaleSelection) -> Result<bool> {
        let check = |dimension, value: Option<&str>| {
            value.map(|v| self.validated(dimension, v)).transpose()
        };
        let language = check(Dimension::Language, selection.language.as_deref())?;
        let default_locale = check(Dimension::DefaultLocale, selection.default_locale.as_deref())?;
        let currency = check(Dimension::Currency, selection.currency.as_deref())?;
        let timezone = check(Dimension::Timezone, selection.timezone.as_deref())?;

        let mut changed = false;
        if let Some(language) = language {
            changed |= self.switch_language(language, false).await?;
        }
        for (dimension, value) in [
            (Dimension::DefaultLocale, default_locale),
            (Dimension::Currency, currency),
            (Dimension::Timezone, timezone),
        ] {
            if let Some(value) = value {
                changed |= self.commit(dimension, value);
            }
        }
        Ok(changed)
    }

    /// Re-fetch translations for the current language and the fallback
    /// languages, replacing the cached data.
    ///
    /// The cached data is only replaced when the fetch succeeds. Resolves to
    /// `Ok(false)` without replacing or announcing anything when a language
    /// request arrived during the fetch.
    #[tracing::instrument(skip(self), target = "horizon_l10n::service", level = "debug")]
    pub async fn reload(&self) -> Result<bool> {
        let ticket = *self.latest_request.lock();
        let language = self.language.get();
        let data = self.load_language(&language).await.inspect_err(|error| {
            tracing::warn!(target: targets::SERVICE, %language, %error, "reload failed; keeping cached translations");
        })?;
        if self.superseded(ticket) {
            return Ok(false);
        }
        self.store.insert(&language, data);
        self.load_fallbacks(true).await;
        if self.superseded(ticket) {
            return Ok(false);
        }
        self.bus.publish(ChangeNotification::TranslationLoaded(language));
        Ok(true)
    }

    /// Load the translations of a module, a provider sub-path such as
    /// `"admin"`, for the current and fallback languages and merge them into
    /// the cached data with the configured merge strategy.
    ///
    /// The module stays registered, so every language fetched afterwards
    /// includes it; cached languages other than the current and fallback ones
    /// are dropped so they are re-fetched on next use. Resolves to `Ok(true)`
    /// once the merged data is cached and
    /// [`ChangeNotification::TranslationLoaded`] was published, and to
    /// `Ok(false)` when a language request arrived during the fetch, in which
    /// case the result is discarded. If the module cannot be loaded for the
    /// current language it is unregistered and the error returned.
    #[tracing::instrument(skip(self), target = "horizon_l10n::service", level = "debug")]
    pub async fn load_module(&self, path: &str) -> Result<bool> {
        let module = path.trim().trim_matches('/').to_string();
        if module.is_empty() {
            return Err(L10nError::config("module path must not be empty"));
        }
        let ticket = *self.latest_request.lock();
        let language = self.language.get();
        let fallbacks: Vec<String> = self
            .config
            .fallback_languages()
            .iter()
            .filter(|fallback| !fallback.eq_ignore_ascii_case(&language))
            .cloned()
            .collect();

        let registered = {
            let mut modules = self.modules.lock();
            let fresh = !modules.contains(&module);
            if fresh {
                modules.push(module.clone());
            }
            fresh
        };
        if registered {
            let keep: Vec<String> = std::iter::once(&language)
                .chain(&fallbacks)
                .map(|tag| normalize_tag(tag))
                .collect();
            self.store
                .retain(|cached| keep.iter().any(|tag| tag.eq_ignore_ascii_case(cached)));
        }

        let span = tracing::debug_span!(target: targets::SERVICE, span_names::LOAD, %language, %module);
        let data = match self.loader.load(&language, Some(&module)).instrument(span).await {
            Ok(data) => data,
            Err(error) => {
                if registered {
                    self.modules.lock().retain(|known| *known != module);
                }
                tracing::warn!(target: targets::SERVICE, %module, %error, "could not load module translations");
                return Err(error.into());
            }
        };
        let mut loaded = Vec::with_capacity(fallbacks.len());
        for fallback in fallbacks {
            match self.loader.load(&fallback, Some(&module)).await {
                Ok(data) => loaded.push((fallback, data)),
                Err(error) => {
                    tracing::warn!(
                        target: targets::SERVICE,
                        language = fallback.as_str(),
                        %module,
                        %error,
                        "could not load fallback module translations"
                    );
                }
            }
        }

        if self.superseded(ticket) {
            return Ok(false);
        }
        self.store.merge(&language, data, self.config.merge);
        for (fallback, data) in loaded {
            self.store.merge(&fallback, data, self.config.merge);
        }
        self.bus.publish(ChangeNotification::TranslationLoaded(language));
        Ok(true)
    }

    /// Registered module paths, in registration order.
    pub fn modules(&self) -> Vec<String> {
        self.modules.lock().clone()
    }

    /// Drop all cached translations.
    pub fn clear_cache(&self) {
        self.store.clear();
    }

    async fn switch_language(&self, language: String, force: bool) -> Result<bool> {
        let span = tracing::debug_span!(target: targets::SERVICE, span_names::SET_LANGUAGE, %language);
        async move {
            // A newer request, even for the current language, supersedes pending loads.
            let ticket = {
                let mut latest = self.latest_request.lock();
                *latest += 1;
                *latest
            };
            if !force && self.language.with(|current| *current == language) {
                tracing::debug!(target: targets::SERVICE, "language unchanged");
                return Ok(false);
            }

            let fetched = self.fetch(&language).await;
            self.load_fallbacks(false).await;

            if self.superseded(ticket) {
                return Ok(false);
            }

            let fetched = fetched.inspect_err(|error| {
                tracing::warn!(target: targets::SERVICE, %error, "could not load translations; keeping previous language");
            })?;
            if let Some(data) = fetched {
                self.store.insert(&language, data);
            }

            let changed = self.commit(Dimension::Language, language.clone());
            self.bus.publish(ChangeNotification::TranslationLoaded(language));
            Ok(changed)
        }
        .instrument(span)
        .await
    }

    /// Fresh translations for `language`, or `None` if already cached.
    async fn fetch(&self, language: &str) -> Result<Option<TranslationData>> {
        if self.store.contains(language) {
            tracing::debug!(target: targets::SERVICE, language, "translations already cached");
            return Ok(None);
        }
        let span = tracing::debug_span!(target: targets::SERVICE, span_names::LOAD, language);
        let data = self.load_language(language).instrument(span).await?;
        Ok(Some(data))
    }

    /// Translations for `language` from every provider, with the registered
    /// modules merged in. A failing module is skipped.
    async fn load_language(&self, language: &str) -> Result<TranslationData> {
        let mut data = self.loader.load(language, None).await?;
        let modules = self.modules.lock().clone();
        for module in modules {
            match self.loader.load(language, Some(&module)).await {
                Ok(extra) => data.merge(extra, self.config.merge),
                Err(error) => {
                    tracing::warn!(target: targets::SERVICE, language, %module, %error, "could not load module translations");
                }
            }
        }
        Ok(data)
    }

    /// Returns true if a language request newer than `ticket` was made.
    fn superseded(&self, ticket: u64) -> bool {
        let latest = *self.latest_request.lock();
        if latest != ticket {
            tracing::debug!(target: targets::SERVICE, ticket, latest, "superseded by a newer language request");
        }
        latest != ticket
    }

    async fn load_fallbacks(&self, refresh: bool) {
        for fallback in self.config.fallback_languages() {
            if !refresh && self.store.contains(fallback) {
                continue;
            }
            match self.load_language(fallback).await {
                Ok(data) => {
                    self.store.insert(fallback, data);
                }
                Err(error) => {
                    tracing::warn!(
                        target: targets::SERVICE,
                        language = fallback.as_str(),
                        %error,
                        "could not load fallback translations"
                    );
                }
            }
        }
    }

    fn property(&self, dimension: Dimension) -> &Property<String> {
        match dimension {
            Dimension::Language => &self.language,
            Dimension::DefaultLocale => &self.default_locale,
            Dimension::Currency => &self.currency,
            Dimension::Timezone => &self.timezone,
        }
    }

    /// Store, persist and announce a validated value. Returns true if it changed.
    fn commit(&self, dimension: Dimension, value: String) -> bool {
        let Some(previous) = self.property(dimension).replace(value.clone()) else {
            return false;
        };
        self.persist(dimension, &value);
        tracing::debug!(target: targets::SERVICE, %dimension, %previous, %value, "locale state changed");
        self.bus.publish(ChangeNotification::for_dimension(dimension, value));
        true
    }

    fn persist(&self, dimension: Dimension, value: &str) {
        let key = storage::storage_key(&self.config.storage_prefix, dimension);
        if let Err(error) = self.storage.write(&key, value) {
            tracing::warn!(target: targets::STORAGE, %key, %error, "could not persist locale state");
        }
    }

    fn stored(&self, dimension: Dimension) -> Option<String> {
        let key = storage::storage_key(&self.config.storage_prefix, dimension);
        match self.storage.read(&key) {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(target: targets::STORAGE, %key, %error, "could not read locale state");
                None
            }
        }
    }

    // =========================================================================
    // Translation
    // =========================================================================

    /// Translate `key` in the current language.
    pub fn translate(&self, key: &str) -> String {
        self.translate_in(key, None, &self.language.get())
    }

    /// Translate `key` in the current language, interpolating `params`.
    pub fn translate_with(&self, key: &str, params: &Params) -> String {
        self.translate_in(key, Some(params), &self.language.get())
    }

    /// Translate `key` in a specific language.
    ///
    /// Only cached data is consulted; nothing is fetched.
    pub fn translate_in(&self, key: &str, params: Option<&Params>, language: &str) -> String {
        let data = self.store.get(language);
        let fallbacks = self.fallback_data();
        self.resolver
            .resolve(key, params, language, data.as_deref(), &fallbacks)
    }

    /// Translate several keys in the current language.
    pub fn translate_many<I, K>(&self, keys: I) -> HashMap<String, String>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let language = self.language.get();
        let data = self.store.get(&language);
        let fallbacks = self.fallback_data();
        keys.into_iter()
            .map(|key| {
                let key = key.as_ref();
                let text = self
                    .resolver
                    .resolve(key, None, &language, data.as_deref(), &fallbacks);
                (key.to_string(), text)
            })
            .collect()
    }

    /// Returns true if `key` has a translation for the current language
    /// (including fallback languages under the fallback policy).
    pub fn has(&self, key: &str) -> bool {
        let data = self.store.get(&self.language.get());
        let fallbacks = self.fallback_data();
        self.resolver
            .lookup(key, data.as_deref(), &fallbacks)
            .is_some()
    }

    fn fallback_data(&self) -> Vec<Arc<TranslationData>> {
        self.config
            .fallback_languages()
            .iter()
            .filter_map(|language| self.store.get(language))
            .collect()
    }

    // =========================================================================
    // Formatting
    // =========================================================================

    /// Format a number in the default locale. Currency style uses the current currency.
    pub fn format_number(
        &self,
        value: impl Into<FormatInput>,
        options: &NumberFormatOptions,
    ) -> Result<Option<String>> {
        let currency = self.currency.get();
        self.intl
            .format_number(value, options, &self.default_locale.get(), Some(&currency))
    }

    /// Format a ratio as a percentage in the default locale.
    pub fn format_percent(
        &self,
        value: impl Into<FormatInput>,
        options: &NumberFormatOptions,
    ) -> Result<Option<String>> {
        self.intl
            .format_percent(value, options, &self.default_locale.get())
    }

    /// Format an amount in the current currency and default locale.
    pub fn format_currency(
        &self,
        value: impl Into<FormatInput>,
        options: &NumberFormatOptions,
    ) -> Result<Option<String>> {
        self.intl.format_currency(
            value,
            options,
            &self.default_locale.get(),
            &self.currency.get(),
        )
    }

    /// Format a date in the default locale and current timezone.
    pub fn format_date(
        &self,
        value: impl Into<DateInput>,
        options: &DateFormatOptions,
    ) -> Result<Option<String>> {
        self.intl.format_date(
            value,
            options,
            &self.default_locale.get(),
            &self.timezone.get(),
        )
    }

    /// Parse a number written in the default locale.
    pub fn parse_number(&self, text: &str) -> Result<Option<f64>> {
        self.intl.parse_number(text, &self.default_locale.get())
    }

    // =========================================================================
    // Collation
    // =========================================================================

    /// A collator for the default locale.
    pub fn collator(&self, sensitivity: Sensitivity) -> Collator {
        Collator::new(&self.default_locale.get(), sensitivity)
    }

    /// Compare two strings in the default locale, every difference significant.
    pub fn compare(&self, left: &str, right: &str) -> Ordering {
        self.collator(Sensitivity::Variant).compare(left, right)
    }
}

/// Wires an [`L10nService`] together.
pub struct L10nBuilder {
    config: L10nConfig,
    providers: Vec<Arc<dyn TranslationProvider>>,
    storage: Option<Arc<dyn LocaleStorage>>,
    handler: Option<Arc<dyn TranslationHandler>>,
    system_locales: Option<SystemLocales>,
}

impl fmt::Debug for L10nBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("L10nBuilder")
            .field("config", &self.config)
            .field(
                "providers",
                &self.providers.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .field("custom_storage", &self.storage.is_some())
            .field("custom_handler", &self.handler.is_some())
            .finish_non_exhaustive()
    }
}

impl L10nBuilder {
    /// Start from configuration.
    pub fn new(config: L10nConfig) -> Self {
        Self {
            config,
            providers: Vec::new(),
            storage: None,
            handler: None,
            system_locales: None,
        }
    }

    /// Add a translation provider after those declared in configuration.
    pub fn provider(self, provider: impl TranslationProvider + 'static) -> Self {
        self.shared_provider(Arc::new(provider))
    }

    /// Add a shared translation provider.
    pub fn shared_provider(mut self, provider: Arc<dyn TranslationProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Use `storage` instead of the configured storage strategy.
    pub fn storage(self, storage: impl LocaleStorage + 'static) -> Self {
        self.shared_storage(Arc::new(storage))
    }

    pub fn shared_storage(mut self, storage: Arc<dyn LocaleStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Replace the default interpolating translation handler.
    pub fn handler(mut self, handler: impl TranslationHandler + 'static) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Source of the user's preferred locales for negotiation
    /// (defaults to [`SystemLocale::preferred`]).
    pub fn system_locales<F>(mut self, source: F) -> Self
    where
        F: Fn() -> Vec<String> + Send + Sync + 'static,
    {
        self.system_locales = Some(Arc::new(source));
        self
    }

    /// Validate the configuration and create the service.
    ///
    /// The service starts with the configured defaults; call
    /// [`L10nService::init`] to apply stored or negotiated state and load
    /// translations.
    pub fn build(self) -> Result<Arc<L10nService>> {
        let config = self.config;
        config.validate()?;

        let mut loader = TranslationLoader::new()
            .with_merge(config.merge)
            .with_failure_policy(config.provider_failure)
            .with_concurrency(config.concurrency);
        for declared in &config.providers {
            loader.add_provider(provider_from_config(declared)?);
        }
        for provider in self.providers {
            loader.add_provider(provider);
        }

        let storage: Arc<dyn LocaleStorage> = match self.storage {
            Some(storage) => storage,
            None => storage::from_strategy(&config.storage).unwrap_or_else(|error| {
                tracing::warn!(target: targets::STORAGE, %error, "locale storage unavailable; state will not persist");
                Arc::new(NoStorage)
            }),
        };
        let handler: Arc<dyn TranslationHandler> = match self.handler {
            Some(handler) => handler,
            None => Arc::new(
                DefaultTranslationHandler::new().with_warn_unmatched(config.warn_unmatched_params),
            ),
        };
        let system_locales: SystemLocales = match self.system_locales {
            Some(source) => source,
            None => Arc::new(SystemLocale::preferred),
        };
        let resolver =
            KeyResolver::new(config.missing_key.clone(), handler).with_warn_missing(config.warn_missing);

        let language = normalize_tag(&config.default_locale);
        tracing::debug!(
            target: targets::SERVICE,
            providers = loader.provider_count(),
            %language,
            "localization service built"
        );

        Ok(Arc::new(L10nService {
            language: Property::new(language.clone()),
            default_locale: Property::new(language),
            currency: Property::new(config.default_currency.trim().to_ascii_uppercase()),
            timezone: Property::new(config.default_timezone.trim().to_string()),
            config,
            loader,
            store: TranslationStore::new(),
            resolver,
            storage,
            system_locales,
            bus: ChangeBus::new(),
            intl: IntlFormatter::new(),
            modules: Mutex::new(Vec::new()),
            latest_request: Mutex::new(0),
        }))
    }
}

fn provider_from_config(declared: &ProviderConfig) -> Result<Arc<dyn TranslationProvider>> {
    match declared {
        ProviderConfig::File { dir, prefix } => {
            Ok(Arc::new(FileProvider::new(dir).with_prefix(prefix.clone())))
        }
        #[cfg(feature = "http")]
        ProviderConfig::Http { base_url, prefix } => Ok(Arc::new(
            crate::translation::HttpProvider::new(base_url.as_str())?.with_prefix(prefix.clone()),
        )),
        #[cfg(not(feature = "http"))]
        ProviderConfig::Http { base_url, .. } => Err(L10nError::config(format!(
            "HTTP translation provider '{base_url}' requires the `http` feature"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn service(config: L10nConfig) -> Arc<L10nService> {
        L10nService::builder(config)
            .storage(MemoryStorage::new())
            .build()
            .unwrap()
    }

    #[test]
    fn test_starts_with_configured_defaults() {
        let service = service(L10nConfig::new().with_default_locale("de_DE").with_default_currency("eur"));
        assert_eq!(
            service.state(),
            LocaleState {
                language: "de-DE".into(),
                default_locale: "de-DE".into(),
                currency: "EUR".into(),
                timezone: "UTC".into(),
            }
        );
        assert_eq!(service.dimension(Dimension::Currency).get(), "EUR");
    }

    #[test]
    fn test_validate() {
        let lenient = service(L10nConfig::new());
        assert_eq!(lenient.validate(Dimension::Language, " pt_BR ").unwrap(), "pt-BR");
        assert_eq!(lenient.validate(Dimension::Currency, "jpy").unwrap(), "JPY");
        assert_eq!(lenient.validate(Dimension::Timezone, "Mars/Base").unwrap(), "Mars/Base");
        assert!(lenient.validate(Dimension::Language, "  ").unwrap_err().is_validation());
        assert!(lenient.validate(Dimension::Currency, "EURO").is_err());
        assert!(lenient.validate(Dimension::DefaultLocale, "en US").is_err());

        let strict = service(
            L10nConfig::new()
                .with_strict(true)
                .with_locale(LocaleEntry::new("en-US"))
                .with_locale(LocaleEntry::new("fr-FR").with_currency("EUR")),
        );
        assert_eq!(strict.validate(Dimension::Language, "FR_fr").unwrap(), "fr-FR");
        assert!(strict.validate(Dimension::Language, "de-DE").is_err());
        assert!(strict.validate(Dimension::Currency, "EUR").is_ok());
        assert!(strict.validate(Dimension::Currency, "GBP").is_err());
        assert!(strict.validate(Dimension::Timezone, "Mars/Base").is_err());
        assert!(strict.validate(Dimension::Timezone, "Europe/Paris").is_ok());
    }

    #[test]
    fn test_sync_setters_notify_on_change_only() {
        let service = service(L10nConfig::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        service
            .bus()
            .attach(crate::bus::Channel::Any, move |n| sink.lock().push(n.clone()));

        assert!(service.set_currency("eur").unwrap());
        assert!(!service.set_currency("EUR").unwrap());
        assert!(service.set_currency("").is_err());
        assert!(service.set_timezone("Asia/Tokyo").unwrap());
        assert!(service.set_default_locale("ja-JP").unwrap());

        assert_eq!(
            *seen.lock(),
            vec![
                ChangeNotification::Currency("EUR".into()),
                ChangeNotification::Timezone("Asia/Tokyo".into()),
                ChangeNotification::DefaultLocale("ja-JP".into()),
            ]
        );
    }

    #[test]
    fn test_accept_language() {
        let service = service(L10nConfig::new().with_default_locale("en-US"));
        assert_eq!(service.accept_language(), "en-US,en;q=0.9");

        service.set_default_locale("fr-FR").unwrap();
        assert_eq!(service.accept_language(), "en-US,en;q=0.9,fr-FR;q=0.8,fr;q=0.7");
    }

    #[test]
    fn test_direction_follows_language() {
        let service = service(L10nConfig::new().with_default_locale("ar-EG"));
        assert_eq!(service.direction(), TextDirection::Rtl);
    }

    #[test]
    fn test_selection_from_entry() {
        let entry = LocaleEntry::new("ja-JP").with_currency("JPY").with_timezone("Asia/Tokyo");
        let selection = LocaleSelection::from(&entry);
        assert_eq!(selection.language.as_deref(), Some("ja-JP"));
        assert_eq!(selection.currency.as_deref(), Some("JPY"));
        assert!(selection.default_locale.is_none());
        assert!(LocaleSelection::new().is_empty());
    }
}
