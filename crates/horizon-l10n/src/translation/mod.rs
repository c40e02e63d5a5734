//! Translation data, providers and key resolution.
//!
//! Translations flow through three stages:
//!
//! 1. [`TranslationProvider`]s fetch raw data for a language (memory, files, HTTP).
//! 2. The [`TranslationLoader`] merges the results of all providers and the
//!    [`TranslationStore`] caches them per language.
//! 3. The [`KeyResolver`] looks keys up, applies the missing key policy and
//!    hands the text to a [`TranslationHandler`] for interpolation.

mod data;
#[cfg(feature = "http")]
mod http;
mod loader;
mod provider;
mod resolver;
mod store;

pub use data::{TranslationData, TranslationNode};
#[cfg(feature = "http")]
pub use http::HttpProvider;
pub use loader::TranslationLoader;
pub use provider::{FileProvider, StaticProvider, TranslationProvider};
pub use resolver::{
    DefaultTranslationHandler, KeyResolver, Params, TranslationHandler, interpolate,
    interpolate_with,
};
pub use store::TranslationStore;
