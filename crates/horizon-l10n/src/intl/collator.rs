//! Locale-aware string comparison, sorting and search.
//!
//! With the `cldr` feature comparisons use the CLDR collation rules of the
//! locale. Without it strings are compared level by level on their Unicode
//! decomposition: base letters first, then accents, then case, with
//! lowercase ordered before uppercase.
//!
//! Search always works on folded text, so `"jose"` finds `"José"` unless
//! accents are significant.

use std::cmp::Ordering;
use std::fmt;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::locale::normalize_tag;

/// Which differences between two strings are significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Sensitivity {
    /// Base letters only: `a = á = A`.
    Base,
    /// Base letters and accents: `a ≠ á`, `a = A`.
    Accent,
    /// Base letters and case: `a = á`, `a ≠ A`.
    Case,
    /// Every difference.
    #[default]
    Variant,
}

/// Direction of [`Collator::sort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Compares, sorts and searches strings for one locale.
///
/// ```
/// use horizon_l10n::intl::{Collator, Sensitivity, SortOrder};
///
/// let collator = Collator::new("de-DE", Sensitivity::Base);
/// assert!(collator.equals("Äpfel", "APFEL"));
///
/// let mut fruit = vec!["banana", "Äpfel", "apple"];
/// collator.sort_strings(&mut fruit, SortOrder::Ascending);
/// assert_eq!(fruit, ["Äpfel", "apple", "banana"]);
/// ```
pub struct Collator {
    locale: String,
    sensitivity: Sensitivity,
    #[cfg(feature = "cldr")]
    icu: Option<icu::collator::CollatorBorrowed<'static>>,
}

impl fmt::Debug for Collator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collator")
            .field("locale", &self.locale)
            .field("sensitivity", &self.sensitivity)
            .finish_non_exhaustive()
    }
}

impl Collator {
    /// Create a collator for `locale`.
    pub fn new(locale: &str, sensitivity: Sensitivity) -> Self {
        let locale = normalize_tag(locale);
        Self {
            #[cfg(feature = "cldr")]
            icu: Self::icu_collator(&locale, sensitivity),
            locale,
            sensitivity,
        }
    }

    #[cfg(feature = "cldr")]
    fn icu_collator(
        locale: &str,
        sensitivity: Sensitivity,
    ) -> Option<icu::collator::CollatorBorrowed<'static>> {
        use icu::collator::Collator as IcuCollator;
        use icu::collator::options::{CaseLevel, CollatorOptions, Strength};
        use icu::locale::Locale;

        use horizon_l10n_core::logging::targets;

        let parsed = match locale.parse::<Locale>() {
            Ok(parsed) => parsed,
            Err(error) => {
                tracing::debug!(target: targets::INTL, locale, %error, "unparsable collation locale");
                return None;
            }
        };
        let mut options = CollatorOptions::default();
        options.strength = Some(match sensitivity {
            Sensitivity::Base | Sensitivity::Case => Strength::Primary,
            Sensitivity::Accent => Strength::Secondary,
            Sensitivity::Variant => Strength::Tertiary,
        });
        if sensitivity == Sensitivity::Case {
            options.case_level = Some(CaseLevel::On);
        }
        IcuCollator::try_new(parsed.into(), options)
            .inspect_err(|error| {
                tracing::debug!(target: targets::INTL, locale, %error, "no collation data");
            })
            .ok()
    }

    /// The locale tag this collator compares for.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn sensitivity(&self) -> Sensitivity {
        self.sensitivity
    }

    /// Compare two strings.
    pub fn compare(&self, left: &str, right: &str) -> Ordering {
        #[cfg(feature = "cldr")]
        if let Some(icu) = &self.icu {
            return icu.compare(left, right);
        }
        self.compare_folded(left, right)
    }

    /// Returns true if the strings differ only in insignificant ways.
    pub fn equals(&self, left: &str, right: &str) -> bool {
        self.compare(left, right) == Ordering::Equal
    }

    /// Stable sort of `items` by the string `key` returns for each item.
    pub fn sort<T, F>(&self, items: &mut [T], key: F, order: SortOrder)
    where
        F: Fn(&T) -> &str,
    {
        items.sort_by(|a, b| {
            let ordering = self.compare(key(a), key(b));
            match order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });
    }

    /// Stable sort of a list of strings.
    pub fn sort_strings<S: AsRef<str>>(&self, items: &mut [S], order: SortOrder) {
        self.sort(items, |item| item.as_ref(), order);
    }

    /// Returns true if `query` occurs in `text` under this collator's sensitivity.
    ///
    /// An empty query matches everything.
    pub fn contains(&self, text: &str, query: &str) -> bool {
        self.fold(text).contains(&self.fold(query))
    }

    /// Items for which any of the strings returned by `keys` contains `query`,
    /// in their original order.
    pub fn search<'a, T, F, I>(&self, query: &str, items: &'a [T], keys: F) -> Vec<&'a T>
    where
        F: Fn(&'a T) -> I,
        I: IntoIterator<Item = &'a str>,
    {
        let needle = self.fold(query);
        items
            .iter()
            .filter(|&item| keys(item).into_iter().any(|text| self.fold(text).contains(&needle)))
            .collect()
    }

    fn fold(&self, text: &str) -> String {
        match self.sensitivity {
            Sensitivity::Base => base_letters(text).flat_map(char::to_lowercase).collect(),
            Sensitivity::Accent => text.nfd().flat_map(char::to_lowercase).collect(),
            Sensitivity::Case => base_letters(text).collect(),
            Sensitivity::Variant => text.nfd().collect(),
        }
    }

    fn compare_folded(&self, left: &str, right: &str) -> Ordering {
        let base = || {
            base_letters(left)
                .flat_map(char::to_lowercase)
                .cmp(base_letters(right).flat_map(char::to_lowercase))
        };
        let accents = || {
            left.nfd()
                .flat_map(char::to_lowercase)
                .cmp(right.nfd().flat_map(char::to_lowercase))
        };
        // Lowercase before uppercase.
        let case = || {
            base_letters(left)
                .map(char::is_uppercase)
                .cmp(base_letters(right).map(char::is_uppercase))
        };

        match self.sensitivity {
            Sensitivity::Base => base(),
            Sensitivity::Accent => base().then_with(accents),
            Sensitivity::Case => base().then_with(case),
            Sensitivity::Variant => base()
                .then_with(accents)
                .then_with(case)
                .then_with(|| left.nfd().cmp(right.nfd())),
        }
    }
}

/// Decomposed characters without combining marks.
fn base_letters(text: &str) -> impl Iterator<Item = char> + '_ {
    text.nfd().filter(|c| !is_combining_mark(*c))
}
