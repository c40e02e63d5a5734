//! Error types for Horizon L10n.

use std::fmt;
use std::path::PathBuf;

/// Result type alias for localization operations.
pub type Result<T> = std::result::Result<T, L10nError>;

/// A dimension of the locale state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// Current language tag.
    Language,
    /// Default locale used for formatting.
    DefaultLocale,
    /// Current ISO 4217 currency code.
    Currency,
    /// Current IANA timezone.
    Timezone,
}

impl Dimension {
    /// Every dimension, in commit order.
    pub const ALL: [Dimension; 4] = [
        Self::Language,
        Self::DefaultLocale,
        Self::Currency,
        Self::Timezone,
    ];

    /// Stable lowercase name, used for storage keys and logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Language => "language",
            Self::DefaultLocale => "default_locale",
            Self::Currency => "currency",
            Self::Timezone => "timezone",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur in the localization services.
#[derive(Debug, thiserror::Error)]
pub enum L10nError {
    /// A setter was given an unsupported or malformed value.
    #[error("Invalid {dimension} '{value}': {reason}")]
    Validation {
        dimension: Dimension,
        value: String,
        reason: String,
    },

    /// A translation provider failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Invalid value or options passed to a formatter.
    #[error("Formatting error: {message}")]
    Format { message: String },

    /// Locale storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Configuration could not be parsed.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// File I/O error.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl L10nError {
    /// Create a validation error.
    pub fn validation(
        dimension: Dimension,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Validation {
            dimension,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a formatting error.
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true if this error is a validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Returns true if this error came from a translation provider.
    pub fn is_provider(&self) -> bool {
        matches!(self, Self::Provider(_))
    }

    /// Returns true if this error is a formatting failure.
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }
}

/// Errors produced by translation providers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// No translation resource exists for the language.
    #[error("No translations for '{language}' at {location}")]
    NotFound { language: String, location: String },

    /// HTTP error status (4xx or 5xx).
    #[error("HTTP {status} fetching {url}")]
    Http { status: u16, url: String },

    /// Transport-level failure.
    #[error("Network error: {0}")]
    Network(String),

    /// I/O error.
    #[error("I/O error reading {path}: {message}")]
    Io { path: String, message: String },

    /// The resource was not a valid translation document.
    #[error("Invalid translation data from {location}: {message}")]
    Parse { location: String, message: String },

    /// Any other provider-specific failure.
    #[error("{0}")]
    Other(String),
}

impl ProviderError {
    /// Create a parse error.
    pub fn parse(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            location: location.into(),
            message: message.into(),
        }
    }
}

/// Errors produced by locale storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("Storage I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored document could not be parsed.
    #[error("Corrupt storage at '{path}': {message}")]
    Corrupt { path: PathBuf, message: String },

    /// No storage location could be determined.
    #[error("No storage location available")]
    Unavailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message() {
        let err = L10nError::validation(Dimension::Language, "xx", "not a supported locale");
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Invalid language 'xx': not a supported locale"
        );
    }

    #[test]
    fn test_provider_error_is_transparent() {
        let err: L10nError = ProviderError::Http {
            status: 404,
            url: "http://localhost/en.json".into(),
        }
        .into();
        assert!(err.is_provider());
        assert_eq!(err.to_string(), "HTTP 404 fetching http://localhost/en.json");
    }

    #[test]
    fn test_format_error() {
        let err = L10nError::format("NaN is not a number");
        assert!(err.is_format());
        assert!(!err.is_provider());
    }

    #[test]
    fn test_dimension_names() {
        assert_eq!(Dimension::DefaultLocale.to_string(), "default_locale");
        assert_eq!(Dimension::Timezone.as_str(), "timezone");
    }
}
