//! Key resolution and parameter interpolation.

use std::collections::BTreeMap;
use std::sync::Arc;

use horizon_l10n_core::logging::targets;

use super::TranslationData;
use crate::config::MissingKeyPolicy;

/// Named interpolation parameters.
///
/// ```
/// use horizon_l10n::translation::{interpolate, Params};
///
/// let params = Params::from([("name", "Ana")]);
/// assert_eq!(interpolate("Hello {name}", &params), "Hello Ana");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a parameter.
    pub fn insert(&mut self, name: impl Into<String>, value: impl ToString) {
        self.0.insert(name.into(), value.to_string());
    }

    /// Value of a parameter.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: ToString, const N: usize> From<[(K, V); N]> for Params {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

/// Replace `{name}` placeholders with parameter values.
///
/// Whitespace inside the braces is ignored. Placeholders without a matching
/// parameter are left verbatim. Substituted values are not scanned again.
pub fn interpolate(template: &str, params: &Params) -> String {
    interpolate_with(template, params, &mut |_| {})
}

/// [`interpolate`], reporting each unmatched placeholder name to `on_unmatched`.
pub fn interpolate_with(
    template: &str,
    params: &Params,
    on_unmatched: &mut dyn FnMut(&str),
) -> String {
    let mut result = String::with_capacity(template.len());
    let mut chars = template.chars();

    while let Some(ch) = chars.next() {
        if ch != '{' {
            result.push(ch);
            continue;
        }

        // Read a placeholder name; a second '{' restarts it.
        let mut token = String::new();
        let mut closed = false;
        for c in chars.by_ref() {
            match c {
                '}' => {
                    closed = true;
                    break;
                }
                '{' => {
                    result.push('{');
                    result.push_str(&token);
                    token.clear();
                }
                c => token.push(c),
            }
        }

        if !closed {
            result.push('{');
            result.push_str(&token);
            continue;
        }

        let name = token.trim();
        match params.get(name) {
            Some(value) if !name.is_empty() => result.push_str(value),
            _ => {
                if !name.is_empty() {
                    on_unmatched(name);
                }
                result.push('{');
                result.push_str(&token);
                result.push('}');
            }
        }
    }

    result
}

/// Turns a resolved translation into the text shown to the user.
///
/// The default implementation interpolates parameters; applications replace
/// it to add pluralization, markup escaping and the like.
pub trait TranslationHandler: Send + Sync {
    /// Produce the final text for `key`, whose raw translation is `value`.
    fn parse_value(
        &self,
        key: &str,
        value: &str,
        params: Option<&Params>,
        language: &str,
    ) -> String;
}

/// Interpolates `{name}` placeholders.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTranslationHandler {
    warn_unmatched: bool,
}

impl DefaultTranslationHandler {
    /// Create a handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Log placeholders that have no matching parameter at `warn`.
    pub fn with_warn_unmatched(mut self, warn: bool) -> Self {
        self.warn_unmatched = warn;
        self
    }
}

impl TranslationHandler for DefaultTranslationHandler {
    fn parse_value(
        &self,
        key: &str,
        value: &str,
        params: Option<&Params>,
        language: &str,
    ) -> String {
        let Some(params) = params else {
            return value.to_string();
        };
        if !self.warn_unmatched {
            return interpolate(value, params);
        }
        interpolate_with(value, params, &mut |placeholder| {
            tracing::warn!(
                target: targets::RESOLVER,
                key,
                language,
                placeholder,
                "no parameter for placeholder"
            );
        })
    }
}

/// Applies lookup, missing-key policy and the translation handler.
#[derive(Clone)]
pub struct KeyResolver {
    policy: MissingKeyPolicy,
    warn_missing: bool,
    handler: Arc<dyn TranslationHandler>,
}

impl std::fmt::Debug for KeyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyResolver")
            .field("policy", &self.policy)
            .field("warn_missing", &self.warn_missing)
            .finish_non_exhaustive()
    }
}

impl Default for KeyResolver {
    fn default() -> Self {
        Self::new(MissingKeyPolicy::Key, Arc::new(DefaultTranslationHandler::new()))
    }
}

impl KeyResolver {
    /// Create a resolver.
    pub fn new(policy: MissingKeyPolicy, handler: Arc<dyn TranslationHandler>) -> Self {
        Self {
            policy,
            warn_missing: false,
            handler,
        }
    }

    /// Log missing keys at `warn` instead of `debug`.
    pub fn with_warn_missing(mut self, warn: bool) -> Self {
        self.warn_missing = warn;
        self
    }

    /// The missing key policy.
    pub fn policy(&self) -> &MissingKeyPolicy {
        &self.policy
    }

    /// Raw text for `key`, consulting `fallbacks` in order when the policy
    /// is [`MissingKeyPolicy::Fallback`].
    pub fn lookup<'a>(
        &self,
        key: &str,
        data: Option<&'a TranslationData>,
        fallbacks: &'a [Arc<TranslationData>],
    ) -> Option<&'a str> {
        if let Some(text) = data.and_then(|data| data.get(key)) {
            return Some(text);
        }
        match self.policy {
            MissingKeyPolicy::Fallback(_) => fallbacks.iter().find_map(|data| data.get(key)),
            _ => None,
        }
    }

    /// Resolve `key` to display text. Never fails: missing keys follow the policy.
    pub fn resolve(
        &self,
        key: &str,
        params: Option<&Params>,
        language: &str,
        data: Option<&TranslationData>,
        fallbacks: &[Arc<TranslationData>],
    ) -> String {
        if let Some(text) = self.lookup(key, data, fallbacks) {
            return self.handler.parse_value(key, text, params, language);
        }

        if self.warn_missing {
            tracing::warn!(target: targets::RESOLVER, key, language, "missing translation");
        } else {
            tracing::debug!(target: targets::RESOLVER, key, language, "missing translation");
        }

        match &self.policy {
            MissingKeyPolicy::Default(text) => text.clone(),
            MissingKeyPolicy::Key | MissingKeyPolicy::Fallback(_) => key.to_string(),
        }
    }
}
