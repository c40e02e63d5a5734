//! Locale identifiers, text direction and locale negotiation.
//!
//! # System Locale Detection
//!
//! ```ignore
//! use horizon_l10n::locale::SystemLocale;
//!
//! let locale = SystemLocale::current();
//! println!("System locale: {}", locale); // e.g., "en-US", "fr-FR"
//! ```
//!
//! # Negotiation
//!
//! ```
//! use horizon_l10n::locale::negotiate;
//!
//! let supported = ["en-US", "fr-FR", "de-DE"];
//! assert_eq!(negotiate(&["fr-CA", "en"], &supported, "en-US"), "fr-FR");
//! ```
//!
//! # Text Direction
//!
//! ```
//! use horizon_l10n::locale::TextDirection;
//!
//! assert_eq!(TextDirection::detect("Hello"), TextDirection::Ltr);
//! assert_eq!(TextDirection::for_locale("ar-SA"), TextDirection::Rtl);
//! ```

use std::fmt;

/// Text direction for bidirectional text support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextDirection {
    /// Left-to-right (e.g., English, French, German)
    #[default]
    Ltr,
    /// Right-to-left (e.g., Arabic, Hebrew)
    Rtl,
}

impl TextDirection {
    /// Detect the base direction of a string from its first strong character.
    pub fn detect(text: &str) -> Self {
        use unicode_bidi::{bidi_class, BidiClass};

        for ch in text.chars() {
            match bidi_class(ch) {
                BidiClass::L => return TextDirection::Ltr,
                BidiClass::R | BidiClass::AL => return TextDirection::Rtl,
                _ => continue,
            }
        }

        TextDirection::Ltr
    }

    /// Direction conventionally used by a locale's language.
    pub fn for_locale(locale: &str) -> Self {
        match language_of(locale).as_str() {
            "ar" | "he" | "fa" | "ur" | "yi" | "ps" | "sd" | "ug" | "ku" | "ckb" | "dv" | "arc"
            | "syr" => TextDirection::Rtl,
            _ => TextDirection::Ltr,
        }
    }

    /// Returns true if this is left-to-right direction.
    pub fn is_ltr(&self) -> bool {
        matches!(self, TextDirection::Ltr)
    }

    /// Returns true if this is right-to-left direction.
    pub fn is_rtl(&self) -> bool {
        matches!(self, TextDirection::Rtl)
    }

    /// The value for an HTML `dir` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
        }
    }
}

/// Detailed information about a locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleInfo {
    /// The full locale identifier (e.g., "en-US", "fr-FR").
    pub identifier: String,
    /// The language code (e.g., "en", "fr").
    pub language: String,
    /// The region/country code (e.g., "US", "FR"), if present.
    pub region: Option<String>,
    /// The script code (e.g., "Latn", "Cyrl"), if present.
    pub script: Option<String>,
    /// The text direction for this locale.
    pub direction: TextDirection,
}

impl LocaleInfo {
    /// Parse a locale identifier into its components.
    pub fn parse(identifier: &str) -> Self {
        let mut parts = identifier.split(['-', '_']);

        let language = parts.next().unwrap_or("en").to_lowercase();
        let direction = TextDirection::for_locale(&language);

        let mut region = None;
        let mut script = None;

        for part in parts {
            // Extensions end the language/script/region section.
            if part.len() == 1 {
                break;
            }
            if part.len() == 4 && part.chars().all(|c| c.is_ascii_alphabetic()) {
                script = Some(title_case(part));
            } else if (part.len() == 2 && part.chars().all(|c| c.is_ascii_alphabetic()))
                || (part.len() == 3 && part.chars().all(|c| c.is_ascii_digit()))
            {
                region = Some(part.to_uppercase());
            }
        }

        Self {
            identifier: identifier.to_string(),
            language,
            region,
            script,
            direction,
        }
    }
}

impl Default for LocaleInfo {
    fn default() -> Self {
        Self::parse("en-US")
    }
}

impl fmt::Display for LocaleInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier)
    }
}

/// Builds a BCP 47 tag from its parts.
///
/// ```
/// use horizon_l10n::locale::LocaleBuilder;
///
/// let tag = LocaleBuilder::new("ar")
///     .region("EG")
///     .numbering_system("arab")
///     .calendar("islamic")
///     .build();
/// assert_eq!(tag, "ar-EG-u-nu-arab-ca-islamic");
/// ```
#[derive(Debug, Clone, Default)]
pub struct LocaleBuilder {
    language: String,
    script: Option<String>,
    region: Option<String>,
    numbering_system: Option<String>,
    calendar: Option<String>,
}

impl LocaleBuilder {
    /// Start with a language code.
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            ..Default::default()
        }
    }

    /// Set the script subtag.
    pub fn script(mut self, script: impl Into<String>) -> Self {
        self.script = Some(script.into());
        self
    }

    /// Set the region subtag.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the Unicode numbering system extension (`-u-nu-`).
    pub fn numbering_system(mut self, numbering_system: impl Into<String>) -> Self {
        self.numbering_system = Some(numbering_system.into());
        self
    }

    /// Set the Unicode calendar extension (`-u-ca-`).
    pub fn calendar(mut self, calendar: impl Into<String>) -> Self {
        self.calendar = Some(calendar.into());
        self
    }

    /// Produce the tag.
    pub fn build(&self) -> String {
        let mut tag = self.language.to_lowercase();
        if let Some(script) = non_empty(&self.script) {
            tag.push('-');
            tag.push_str(&title_case(script));
        }
        if let Some(region) = non_empty(&self.region) {
            tag.push('-');
            tag.push_str(&region.to_uppercase());
        }
        let numbering = non_empty(&self.numbering_system);
        let calendar = non_empty(&self.calendar);
        if numbering.is_some() || calendar.is_some() {
            tag.push_str("-u");
            if let Some(nu) = numbering {
                tag.push_str("-nu-");
                tag.push_str(nu);
            }
            if let Some(ca) = calendar {
                tag.push_str("-ca-");
                tag.push_str(ca);
            }
        }
        tag
    }
}

/// Static methods for detecting the system locale.
pub struct SystemLocale;

impl SystemLocale {
    /// Get the current system locale identifier.
    ///
    /// Returns a BCP 47 locale identifier (e.g., "en-US", "fr-FR", "de-DE").
    #[cfg(feature = "cldr")]
    pub fn current() -> String {
        sys_locale::get_locale().unwrap_or_else(|| "en-US".to_string())
    }

    #[cfg(not(feature = "cldr"))]
    pub fn current() -> String {
        "en-US".to_string()
    }

    /// The user's preferred locales, most preferred first.
    #[cfg(feature = "cldr")]
    pub fn preferred() -> Vec<String> {
        let locales: Vec<String> = sys_locale::get_locales().collect();
        if locales.is_empty() {
            vec![Self::current()]
        } else {
            locales
        }
    }

    #[cfg(not(feature = "cldr"))]
    pub fn preferred() -> Vec<String> {
        vec![Self::current()]
    }

    /// Get detailed information about the current system locale.
    pub fn info() -> LocaleInfo {
        LocaleInfo::parse(&Self::current())
    }
}

/// Pick the best supported locale for a list of requested ones.
///
/// Requested locales are tried in order. Each is first matched exactly
/// (case-insensitive, `_` and `-` equivalent), then by language alone. The
/// first hit wins; with no hit `default` is returned.
pub fn negotiate<R, S>(requested: &[R], supported: &[S], default: &str) -> String
where
    R: AsRef<str>,
    S: AsRef<str>,
{
    for wanted in requested {
        let wanted = normalize_tag(wanted.as_ref());
        if let Some(hit) = supported
            .iter()
            .find(|s| normalize_tag(s.as_ref()).eq_ignore_ascii_case(&wanted))
        {
            return hit.as_ref().to_string();
        }
        let language = language_of(&wanted);
        if let Some(hit) = supported
            .iter()
            .find(|s| language_of(s.as_ref()) == language)
        {
            return hit.as_ref().to_string();
        }
    }
    default.to_string()
}

/// Canonical form of a locale tag: trimmed, `-` separated, lowercase
/// language, title-case script and uppercase region (`EN_us` -> `en-US`,
/// `zh-hant-tw` -> `zh-Hant-TW`).
///
/// Subtags after an extension or private-use singleton are lowercased.
pub fn normalize_tag(tag: &str) -> String {
    let mut extension = false;
    tag.trim()
        .split(['-', '_'])
        .enumerate()
        .map(|(index, subtag)| {
            if index == 0 || extension {
                return subtag.to_ascii_lowercase();
            }
            if subtag.len() == 1 {
                extension = true;
                return subtag.to_ascii_lowercase();
            }
            let alphabetic = subtag.chars().all(|c| c.is_ascii_alphabetic());
            match subtag.len() {
                4 if alphabetic => title_case(subtag),
                2 if alphabetic => subtag.to_ascii_uppercase(),
                _ => subtag.to_ascii_lowercase(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// Lowercased language subtag of a locale tag.
pub fn language_of(tag: &str) -> String {
    tag.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Returns true if `tag` has the shape of a BCP 47 tag: an alphabetic
/// language subtag of 2 to 8 letters followed by alphanumeric subtags of 1 to
/// 8 characters, separated by `-` or `_`.
pub fn is_well_formed(tag: &str) -> bool {
    let mut subtags = tag.trim().split(['-', '_']);
    let Some(language) = subtags.next() else {
        return false;
    };
    (2..=8).contains(&language.len())
        && language.chars().all(|c| c.is_ascii_alphabetic())
        && subtags.all(|s| (1..=8).contains(&s.len()) && s.chars().all(|c| c.is_ascii_alphanumeric()))
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
