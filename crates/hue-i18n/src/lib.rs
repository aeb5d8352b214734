#![forbid(unsafe_code)]

//! Localization foundation for Hue.
//!
//! Provides externalized string storage with key-based lookup, locale
//! fallback, ICU-style plural forms, `{name}` interpolation, and a JSON
//! loader for per-locale translation files.
//!
//! # How it fits in the system
//! `hue-i18n` does not know about themes or settings. `hue-runtime` owns the
//! active locale and asks the catalog for text; the catalog itself is
//! immutable after loading apart from its once-per-key miss log.

pub mod catalog;
pub mod error;
pub mod loader;
pub mod plural;

pub use catalog::{
    CoverageReport, LocaleCoverage, LocaleStrings, StringCatalog, StringEntry, interpolate,
    language_of, normalize_locale_tag,
};
pub use error::I18nError;
pub use loader::{load_dir, load_file, parse_locale_json};
pub use plural::{PluralCategory, PluralForms, PluralRule};
