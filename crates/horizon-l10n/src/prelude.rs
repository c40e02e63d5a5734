//! Prelude module for Horizon L10n.
//!
//! ```ignore
//! use horizon_l10n::prelude::*;
//! ```

// ============================================================================
// Service
// ============================================================================

pub use crate::service::{L10nBuilder, L10nService, LocaleSelection, LocaleState};
pub use crate::config::{L10nConfig, LocaleEntry, MissingKeyPolicy, StorageStrategy};
pub use crate::error::{Dimension, L10nError};

// ============================================================================
// Notifications and Bindings
// ============================================================================

pub use crate::bus::{ChangeNotification, Channel, Subscription};
pub use crate::binding::{DimensionBinding, LocaleBinding, TranslateBinding};

// ============================================================================
// Translations
// ============================================================================

pub use crate::translation::{
    FileProvider, Params, StaticProvider, TranslationData, TranslationProvider,
};

// ============================================================================
// Formatting
// ============================================================================

pub use crate::intl::{
    Collator, CurrencyDisplay, DateFormatOptions, DateLength, NumberFormatOptions, NumberStyle,
    Sensitivity, SortOrder, TimeLength,
};
pub use crate::locale::TextDirection;
