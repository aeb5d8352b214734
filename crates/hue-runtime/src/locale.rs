#![forbid(unsafe_code)]

//! Locale identifiers and system locale detection.
//!
//! A [`Locale`] is a canonical `language[-Script][-Region]` tag. Parsing
//! accepts `_` or `-` separators and any letter case (`en_us`, `EN-us`), and
//! also the POSIX environment form (`ar_EG.UTF-8@latin`), whose encoding
//! and modifier suffixes are dropped.

use std::fmt;
use std::str::FromStr;

use hue_i18n::{language_of, normalize_locale_tag};

/// Reading direction of a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

impl TextDirection {
    #[must_use]
    pub const fn is_rtl(self) -> bool {
        matches!(self, Self::Rtl)
    }
}

/// Languages written right to left.
const RTL_LANGUAGES: &[&str] = &["ar", "he", "fa", "ur", "ps", "yi", "dv", "ckb"];

/// A canonical locale tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locale {
    tag: String,
}

impl Locale {
    /// Parse and canonicalise a tag.
    pub fn parse(tag: &str) -> Result<Self, LocaleError> {
        let trimmed = tag.trim();
        let bare = trimmed
            .split(['.', '@'])
            .next()
            .unwrap_or_default();
        let canonical = normalize_locale_tag(bare);
        let language = language_of(&canonical);
        let valid_language = (2..=3).contains(&language.len())
            && language.chars().all(|c| c.is_ascii_lowercase());
        let valid_rest = canonical
            .split('-')
            .skip(1)
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric()));
        if !valid_language || !valid_rest {
            return Err(LocaleError {
                input: tag.to_string(),
            });
        }
        Ok(Self { tag: canonical })
    }

    /// The canonical tag (`en-US`).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.tag
    }

    /// Language subtag (`en`).
    #[must_use]
    pub fn language(&self) -> &str {
        language_of(&self.tag)
    }

    /// Two-letter or three-digit region subtag, if present.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.tag.split('-').skip(1).find(|part| {
            (part.len() == 2 && part.chars().all(|c| c.is_ascii_uppercase()))
                || (part.len() == 3 && part.chars().all(|c| c.is_ascii_digit()))
        })
    }

    /// A locale with only the language subtag.
    #[must_use]
    pub fn language_only(&self) -> Self {
        Self {
            tag: self.language().to_string(),
        }
    }

    #[must_use]
    pub fn direction(&self) -> TextDirection {
        if RTL_LANGUAGES.contains(&self.language()) {
            TextDirection::Rtl
        } else {
            TextDirection::Ltr
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        &self.tag
    }
}

/// A string that is not a usable locale tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleError {
    input: String,
}

impl LocaleError {
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for LocaleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid locale tag {:?}", self.input)
    }
}

impl std::error::Error for LocaleError {}

/// Environment variables consulted for the system locale, highest priority
/// first.
pub const LOCALE_ENV_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// Locale from the process environment, if one is set and usable.
#[must_use]
pub fn detect_system_locale() -> Option<Locale> {
    detect_locale_with(|name| std::env::var(name).ok())
}

/// [`detect_system_locale`] over an arbitrary variable source.
///
/// The first variable that is set and non-empty decides. `C` and `POSIX`
/// mean "no preference".
pub fn detect_locale_with(lookup: impl Fn(&str) -> Option<String>) -> Option<Locale> {
    let value = LOCALE_ENV_VARS
        .into_iter()
        .filter_map(&lookup)
        .find(|value| !value.trim().is_empty())?;
    let bare = value.split(['.', '@']).next().unwrap_or_default();
    if matches!(bare, "C" | "POSIX") {
        return None;
    }
    Locale::parse(bare).ok()
}
