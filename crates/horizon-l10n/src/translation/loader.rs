//! Fetches translations from every provider and merges them.

use std::sync::Arc;

use futures_util::future::join_all;
use horizon_l10n_core::PerfSpan;
use horizon_l10n_core::logging::targets;

use super::{TranslationData, TranslationProvider};
use crate::config::{MergeStrategy, ProviderConcurrency, ProviderFailurePolicy};
use crate::error::ProviderError;

/// Invokes the configured providers for a language and merges their results
/// in provider order.
#[derive(Clone, Default)]
pub struct TranslationLoader {
    providers: Vec<Arc<dyn TranslationProvider>>,
    merge: MergeStrategy,
    failure: ProviderFailurePolicy,
    concurrency: ProviderConcurrency,
}

impl std::fmt::Debug for TranslationLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationLoader")
            .field(
                "providers",
                &self.providers.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .field("merge", &self.merge)
            .field("failure", &self.failure)
            .field("concurrency", &self.concurrency)
            .finish()
    }
}

impl TranslationLoader {
    /// Create a loader without providers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider. Later providers win merge collisions.
    pub fn with_provider(mut self, provider: Arc<dyn TranslationProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Append a provider.
    pub fn add_provider(&mut self, provider: Arc<dyn TranslationProvider>) {
        self.providers.push(provider);
    }

    /// Set the merge strategy.
    pub fn with_merge(mut self, merge: MergeStrategy) -> Self {
        self.merge = merge;
        self
    }

    /// Set the provider failure policy.
    pub fn with_failure_policy(mut self, failure: ProviderFailurePolicy) -> Self {
        self.failure = failure;
        self
    }

    /// Set the invocation mode.
    pub fn with_concurrency(mut self, concurrency: ProviderConcurrency) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Number of providers.
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Fetch and merge translations for `language`.
    ///
    /// With no providers the result is empty data. Under
    /// [`ProviderFailurePolicy::FailSoft`] failing providers are skipped unless
    /// all of them fail, in which case the first error is returned.
    #[tracing::instrument(skip(self), target = "horizon_l10n::loader", level = "debug")]
    pub async fn load(
        &self,
        language: &str,
        path: Option<&str>,
    ) -> Result<TranslationData, ProviderError> {
        let _perf = PerfSpan::new("load_translations");

        if self.providers.is_empty() {
            tracing::debug!(target: targets::LOADER, language, "no providers configured");
            return Ok(TranslationData::new());
        }

        let results = match self.concurrency {
            ProviderConcurrency::Concurrent => {
                join_all(
                    self.providers
                        .iter()
                        .map(|provider| provider.get_translation(language, path)),
                )
                .await
            }
            ProviderConcurrency::Sequential => {
                let mut results = Vec::with_capacity(self.providers.len());
                for provider in &self.providers {
                    let result = provider.get_translation(language, path).await;
                    let failed = result.is_err();
                    results.push(result);
                    if failed && self.failure == ProviderFailurePolicy::Strict {
                        break;
                    }
                }
                results
            }
        };

        let mut merged = TranslationData::new();
        let mut first_error = None;
        let mut succeeded = 0usize;

        for (provider, result) in self.providers.iter().zip(results) {
            match result {
                Ok(data) => {
                    merged.merge(data, self.merge);
                    succeeded += 1;
                }
                Err(error) => {
                    tracing::warn!(
                        target: targets::LOADER,
                        provider = provider.name(),
                        language,
                        %error,
                        "translation provider failed"
                    );
                    if self.failure == ProviderFailurePolicy::Strict {
                        return Err(error);
                    }
                    first_error.get_or_insert(error);
                }
            }
        }

        if succeeded == 0 {
            if let Some(error) = first_error {
                return Err(error);
            }
        }

        tracing::debug!(
            target: targets::LOADER,
            language,
            providers = succeeded,
            keys = merged.len(),
            "translations loaded"
        );
        Ok(merged)
    }
}
