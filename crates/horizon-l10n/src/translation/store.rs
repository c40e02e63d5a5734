//! Per-language cache of loaded translations.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::TranslationData;
use crate::config::MergeStrategy;
use crate::locale::normalize_tag;

/// Cache of merged translations keyed by language tag.
///
/// Entries are immutable; reloading replaces an entry wholesale.
#[derive(Debug, Default)]
pub struct TranslationStore {
    entries: RwLock<HashMap<String, Arc<TranslationData>>>,
}

impl TranslationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn key(language: &str) -> String {
        normalize_tag(language).to_lowercase()
    }

    /// Cached translations for `language`.
    pub fn get(&self, language: &str) -> Option<Arc<TranslationData>> {
        self.entries.read().get(&Self::key(language)).cloned()
    }

    /// Returns true if `language` is cached.
    pub fn contains(&self, language: &str) -> bool {
        self.entries.read().contains_key(&Self::key(language))
    }

    /// Cache translations for `language`, returning the shared handle.
    pub fn insert(&self, language: &str, data: TranslationData) -> Arc<TranslationData> {
        let data = Arc::new(data);
        self.entries.write().insert(Self::key(language), Arc::clone(&data));
        data
    }

    /// Merge `data` into the cached translations for `language`.
    ///
    /// Returns false and leaves the store untouched when nothing is cached
    /// for `language`.
    pub fn merge(&self, language: &str, data: TranslationData, strategy: MergeStrategy) -> bool {
        let mut entries = self.entries.write();
        let Some(entry) = entries.get_mut(&Self::key(language)) else {
            return false;
        };
        let mut merged = TranslationData::clone(entry);
        merged.merge(data, strategy);
        *entry = Arc::new(merged);
        true
    }

    /// Keep only the languages for which `keep` returns true.
    pub fn retain(&self, mut keep: impl FnMut(&str) -> bool) {
        self.entries.write().retain(|language, _| keep(language));
    }

    /// Drop the cached translations for `language`.
    pub fn invalidate(&self, language: &str) -> bool {
        self.entries.write().remove(&Self::key(language)).is_some()
    }

    /// Drop everything.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Cached language keys (normalized, lower-case).
    pub fn languages(&self) -> Vec<String> {
        let mut languages: Vec<String> = self.entries.read().keys().cloned().collect();
        languages.sort();
        languages
    }
}
