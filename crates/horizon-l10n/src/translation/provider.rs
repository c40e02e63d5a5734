//! Translation providers: sources of [`TranslationData`] for a language.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use futures_util::FutureExt;
use futures_util::future::BoxFuture;

use super::TranslationData;
use crate::error::ProviderError;
use crate::locale::normalize_tag;

/// A source of translations.
///
/// Given a language tag and an optional path (a module or sub-directory),
/// asynchronously produces the translations for that language.
///
/// ```
/// use futures_util::future::BoxFuture;
/// use futures_util::FutureExt;
/// use horizon_l10n::error::ProviderError;
/// use horizon_l10n::translation::{TranslationData, TranslationProvider};
///
/// struct Greetings;
///
/// impl TranslationProvider for Greetings {
///     fn get_translation<'a>(
///         &'a self,
///         language: &'a str,
///         _path: Option<&'a str>,
///     ) -> BoxFuture<'a, Result<TranslationData, ProviderError>> {
///         async move {
///             let hello = if language.starts_with("de") { "Hallo" } else { "Hello" };
///             Ok(TranslationData::new().with("hello", hello))
///         }
///         .boxed()
///     }
/// }
/// ```
pub trait TranslationProvider: Send + Sync {
    /// Name used in log messages.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Fetch translations for `language`.
    fn get_translation<'a>(
        &'a self,
        language: &'a str,
        path: Option<&'a str>,
    ) -> BoxFuture<'a, Result<TranslationData, ProviderError>>;
}

/// Provider serving translations held in memory.
///
/// The path argument is ignored. Unknown languages fail with
/// [`ProviderError::NotFound`].
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    name: String,
    languages: HashMap<String, TranslationData>,
}

impl StaticProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self {
            name: "static".to_string(),
            languages: HashMap::new(),
        }
    }

    /// Set the name shown in log messages.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Add translations for a language.
    pub fn with_language(mut self, language: &str, data: TranslationData) -> Self {
        self.insert(language, data);
        self
    }

    /// Add or replace translations for a language.
    pub fn insert(&mut self, language: &str, data: TranslationData) {
        self.languages.insert(normalize_tag(language).to_lowercase(), data);
    }
}

impl TranslationProvider for StaticProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_translation<'a>(
        &'a self,
        language: &'a str,
        _path: Option<&'a str>,
    ) -> BoxFuture<'a, Result<TranslationData, ProviderError>> {
        let result = self
            .languages
            .get(&normalize_tag(language).to_lowercase())
            .cloned()
            .ok_or_else(|| ProviderError::NotFound {
                language: language.to_string(),
                location: self.name.clone(),
            });
        futures_util::future::ready(result).boxed()
    }
}

/// Provider reading `<dir>/[<path>/]<prefix><language>.json` (or `.toml`).
#[derive(Debug, Clone)]
pub struct FileProvider {
    dir: PathBuf,
    prefix: String,
}

impl FileProvider {
    /// Read files from `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            prefix: String::new(),
        }
    }

    /// Prepend `prefix` to file names (`"locale-"` reads `locale-en-US.json`).
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Directory translations are read from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn candidates(&self, language: &str, path: Option<&str>) -> Vec<PathBuf> {
        let mut dir = self.dir.clone();
        if let Some(path) = path.filter(|p| !p.is_empty()) {
            dir.push(path);
        }
        ["json", "toml"]
            .iter()
            .map(|ext| dir.join(format!("{}{}.{}", self.prefix, language, ext)))
            .collect()
    }
}

impl TranslationProvider for FileProvider {
    fn name(&self) -> &str {
        "file"
    }

    fn get_translation<'a>(
        &'a self,
        language: &'a str,
        path: Option<&'a str>,
    ) -> BoxFuture<'a, Result<TranslationData, ProviderError>> {
        async move {
            for candidate in self.candidates(language, path) {
                let location = candidate.display().to_string();
                let source = match tokio::fs::read_to_string(&candidate).await {
                    Ok(source) => source,
                    Err(e) if e.kind() == ErrorKind::NotFound => continue,
                    Err(e) => {
                        return Err(ProviderError::Io {
                            path: location,
                            message: e.to_string(),
                        });
                    }
                };
                let is_toml = candidate.extension().is_some_and(|ext| ext == "toml");
                return if is_toml {
                    TranslationData::parse_toml(&source, &location)
                } else {
                    TranslationData::parse_json(&source, &location)
                };
            }
            Err(ProviderError::NotFound {
                language: language.to_string(),
                location: self.dir.display().to_string(),
            })
        }
        .boxed()
    }
}
