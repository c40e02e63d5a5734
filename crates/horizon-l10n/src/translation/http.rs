//! HTTP translation provider.

use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;

use super::{TranslationData, TranslationProvider};
use crate::error::ProviderError;

/// Provider fetching `GET <base_url>/[<path>/]<prefix><language>.json`.
///
/// Non-2xx responses fail with [`ProviderError::Http`], bodies that are not a
/// JSON object with [`ProviderError::Parse`].
#[derive(Debug, Clone)]
pub struct HttpProvider {
    client: reqwest::Client,
    base_url: String,
    prefix: String,
}

impl HttpProvider {
    /// Fetch from `base_url` with a default client (30 second timeout).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        Ok(Self::with_client(client, base_url))
    }

    /// Fetch from `base_url` with a caller-configured client.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            prefix: String::new(),
        }
    }

    /// Prepend `prefix` to resource names.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// URL of the resource for `language`.
    pub fn url_for(&self, language: &str, path: Option<&str>) -> String {
        match path.map(|p| p.trim_matches('/')).filter(|p| !p.is_empty()) {
            Some(path) => format!("{}/{}/{}{}.json", self.base_url, path, self.prefix, language),
            None => format!("{}/{}{}.json", self.base_url, self.prefix, language),
        }
    }
}

impl TranslationProvider for HttpProvider {
    fn name(&self) -> &str {
        "http"
    }

    fn get_translation<'a>(
        &'a self,
        language: &'a str,
        path: Option<&'a str>,
    ) -> BoxFuture<'a, Result<TranslationData, ProviderError>> {
        async move {
            let url = self.url_for(language, path);
            let response = self
                .client
                .get(&url)
                .header("Accept", "application/json")
                .send()
                .await
                .map_err(|e| ProviderError::Network(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(ProviderError::Http {
                    status: status.as_u16(),
                    url,
                });
            }

            let body = response
                .text()
                .await
                .map_err(|e| ProviderError::Network(e.to_string()))?;
            TranslationData::parse_json(&body, &url)
        }
        .boxed()
    }
}
