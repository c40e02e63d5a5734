//! Horizon L10n - locale state, translations and locale-aware formatting.
//!
//! - **Locale state**: [`L10nService`] coordinates the current language,
//!   default formatting locale, currency and timezone, validating and
//!   persisting every change
//! - **Translations**: pluggable providers, merged and cached per language,
//!   resolved by dotted keys with `{name}` interpolation
//! - **Formatting**: numbers, percentages, currencies and dates through
//!   [`IntlFormatter`] (CLDR data with the `cldr` feature)
//! - **Change notifications**: a [`ChangeBus`] with one channel per dimension
//!
//! # Example
//!
//! ```no_run
//! use horizon_l10n::prelude::*;
//!
//! # async fn run() -> horizon_l10n::Result<()> {
//! let service = L10nService::builder(L10nConfig::load("l10n.toml")?).build()?;
//! service.init().await?;
//!
//! service.bus().attach(Channel::Language, |change| {
//!     println!("language is now {}", change.value());
//! });
//! service.set_language("de-DE").await?;
//!
//! let price = service.format_currency(1234.5, &NumberFormatOptions::currency())?;
//! println!("{} {}", service.translate("cart.total"), price.unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod binding;
pub mod bus;
pub mod config;
pub mod error;
pub mod intl;
pub mod locale;
pub mod prelude;
pub mod service;
pub mod storage;
pub mod translation;

pub use bus::{ChangeBus, ChangeNotification, Channel, Subscription};
pub use config::{
    L10nConfig, LocaleEntry, MergeStrategy, MissingKeyPolicy, ProviderConcurrency,
    ProviderConfig, ProviderFailurePolicy, StorageStrategy,
};
pub use error::{Dimension, L10nError, ProviderError, Result, StorageError};
pub use intl::IntlFormatter;
pub use locale::{LocaleInfo, TextDirection};
pub use service::{L10nBuilder, L10nService, LocaleSelection, LocaleState};

pub use horizon_l10n_core::{
    ConnectionGuard, ConnectionId, PerfSpan, Property, ReadOnlyProperty, Signal, SignalEmitter,
    logging,
};
