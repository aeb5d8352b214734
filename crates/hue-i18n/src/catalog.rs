#![forbid(unsafe_code)]

//! String catalog with locale fallback, plural selection, and interpolation.
//!
//! # Lookup order
//!
//! For a request `(locale, key)` the catalog tries, in order and skipping
//! duplicates:
//!
//! 1. the locale exactly as given (`"en_US"`),
//! 2. its normalized tag (`"en-US"`),
//! 3. its language subtag (`"en"`),
//! 4. every locale in the explicit fallback chain,
//! 5. the fallback locale.
//!
//! The first locale that defines the key wins. Plural forms are selected with
//! the [`PluralRule`] of the locale that supplied the entry, so a Russian
//! string that fell back to English is still pluralized with English rules.
//!
//! # Misses
//!
//! `get*` and `format*` return `None` on a miss. The `translate*` family
//! applies the app-facing policy: a key missing from every candidate locale
//! renders as the key itself, and a warning is logged once per
//! `(locale, key)` pair.

use std::cell::RefCell;

use ahash::{AHashMap, AHashSet};
use tracing::{debug, warn};

use crate::plural::{PluralForms, PluralRule};

/// Distinct `(locale, key)` misses remembered for warn-once logging. Past
/// this, new misses log at debug level and are not remembered.
const MAX_REPORTED_MISSES: usize = 1024;

/// A single catalog value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringEntry {
    Simple(String),
    Plural(PluralForms),
}

impl StringEntry {
    /// Text used when the entry is read without a count. Plural entries
    /// answer with their `other` form.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Simple(text) => text,
            Self::Plural(forms) => &forms.other,
        }
    }

    #[must_use]
    pub fn is_plural(&self) -> bool {
        matches!(self, Self::Plural(_))
    }
}

impl From<String> for StringEntry {
    fn from(text: String) -> Self {
        Self::Simple(text)
    }
}

impl From<&str> for StringEntry {
    fn from(text: &str) -> Self {
        Self::Simple(text.to_string())
    }
}

impl From<PluralForms> for StringEntry {
    fn from(forms: PluralForms) -> Self {
        Self::Plural(forms)
    }
}

/// All entries of one locale, keyed by dotted path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleStrings {
    entries: AHashMap<String, StringEntry>,
}

impl LocaleStrings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a simple string, returning the entry it replaced.
    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) -> Option<StringEntry> {
        self.entries
            .insert(key.into(), StringEntry::Simple(text.into()))
    }

    /// Insert a pluralized entry, returning the entry it replaced.
    pub fn insert_plural(&mut self, key: impl Into<String>, forms: PluralForms) -> Option<StringEntry> {
        self.entries.insert(key.into(), StringEntry::Plural(forms))
    }

    /// Insert any entry, returning the entry it replaced.
    pub fn insert_entry(&mut self, key: impl Into<String>, entry: StringEntry) -> Option<StringEntry> {
        self.entries.insert(key.into(), entry)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&StringEntry> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in sorted order.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Move every entry of `other` into `self`, prefixing keys with
    /// `prefix.` when given. Returns the keys that were overwritten.
    pub fn merge(&mut self, other: LocaleStrings, prefix: Option<&str>) -> Vec<String> {
        let mut overwritten = Vec::new();
        for (key, entry) in other.entries {
            let key = match prefix {
                Some(prefix) if !prefix.is_empty() => format!("{prefix}.{key}"),
                _ => key,
            };
            if self.entries.contains_key(&key) {
                overwritten.push(key.clone());
            }
            self.entries.insert(key, entry);
        }
        overwritten.sort_unstable();
        overwritten
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StringEntry)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Per-locale coverage against the union of all keys.
#[derive(Debug, Clone, PartialEq)]
pub struct LocaleCoverage {
    pub locale: String,
    pub present: usize,
    /// Missing keys, sorted.
    pub missing: Vec<String>,
    /// `present / total * 100`, or 100 when the catalog has no keys.
    pub coverage_percent: f64,
}

/// Coverage of every locale in a catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageReport {
    pub total_keys: usize,
    /// One row per locale, sorted by locale.
    pub locales: Vec<LocaleCoverage>,
}

impl CoverageReport {
    /// True when every locale defines every key.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.locales.iter().all(|lc| lc.missing.is_empty())
    }
}

/// Translations for every locale plus the fallback policy.
#[derive(Debug, Clone, Default)]
pub struct StringCatalog {
    locales: AHashMap<String, LocaleStrings>,
    fallback_locale: Option<String>,
    fallback_chain: Vec<String>,
    plural_rules: AHashMap<String, PluralRule>,
    reported_misses: RefCell<AHashSet<(String, String)>>,
}

impl StringCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add strings for `locale`. Strings for a locale that is already present
    /// are merged in, the new entries winning on conflicts.
    pub fn add_locale(&mut self, locale: impl Into<String>, strings: LocaleStrings) {
        let locale = locale.into();
        let added = strings.len();
        let slot = self.locales.entry(locale.clone()).or_default();
        let overwritten = slot.merge(strings, None);
        debug!(
            locale = locale.as_str(),
            added,
            overwritten = overwritten.len(),
            "locale strings added"
        );
    }

    /// Builder-style [`Self::set_fallback_locale`].
    #[must_use]
    pub fn with_fallback_locale(mut self, locale: impl Into<String>) -> Self {
        self.set_fallback_locale(locale);
        self
    }

    /// Locale consulted last for every lookup.
    pub fn set_fallback_locale(&mut self, locale: impl Into<String>) {
        self.fallback_locale = Some(locale.into());
    }

    #[must_use]
    pub fn fallback_locale(&self) -> Option<&str> {
        self.fallback_locale.as_deref()
    }

    /// Locales consulted, in order, before the fallback locale.
    pub fn set_fallback_chain<I, S>(&mut self, chain: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fallback_chain = chain.into_iter().map(Into::into).collect();
    }

    /// Override the plural rule for a locale.
    pub fn set_plural_rule(&mut self, locale: impl Into<String>, rule: PluralRule) {
        self.plural_rules.insert(locale.into(), rule);
    }

    /// Plural rule for `locale`: an explicit override for the tag or its
    /// language, else the built-in rule.
    #[must_use]
    pub fn plural_rule(&self, locale: &str) -> PluralRule {
        self.plural_rules
            .get(locale)
            .or_else(|| self.plural_rules.get(language_of(locale)))
            .copied()
            .unwrap_or_else(|| PluralRule::for_locale(locale))
    }

    /// Locales with at least one entry set, sorted.
    #[must_use]
    pub fn locales(&self) -> Vec<&str> {
        let mut locales: Vec<&str> = self.locales.keys().map(String::as_str).collect();
        locales.sort_unstable();
        locales
    }

    #[must_use]
    pub fn has_locale(&self, locale: &str) -> bool {
        self.locales.contains_key(locale)
    }

    #[must_use]
    pub fn strings(&self, locale: &str) -> Option<&LocaleStrings> {
        self.locales.get(locale)
    }

    /// Best catalog locale for a requested tag: exact, normalized, language
    /// subtag, then the fallback locale. `None` when nothing matches.
    #[must_use]
    pub fn resolve_locale(&self, requested: &str) -> Option<&str> {
        let normalized = normalize_locale_tag(requested);
        [requested, normalized.as_str(), language_of(&normalized)]
            .into_iter()
            .chain(self.fallback_locale.as_deref())
            .find_map(|candidate| {
                self.locales
                    .get_key_value(candidate)
                    .map(|(k, _)| k.as_str())
            })
    }

    /// Catalog locales consulted for `locale`, in lookup order.
    #[must_use]
    pub fn lookup_chain(&self, locale: &str) -> Vec<&str> {
        let normalized = normalize_locale_tag(locale);
        let language = language_of(&normalized).to_string();
        let candidates = [locale, normalized.as_str(), language.as_str()]
            .into_iter()
            .chain(self.fallback_chain.iter().map(String::as_str))
            .chain(self.fallback_locale.as_deref());

        let mut chain: Vec<&str> = Vec::with_capacity(4);
        for candidate in candidates {
            if let Some((key, _)) = self.locales.get_key_value(candidate)
                && !chain.contains(&key.as_str())
            {
                chain.push(key.as_str());
            }
        }
        chain
    }

    /// Entry for `key` together with the locale that supplied it.
    #[must_use]
    pub fn lookup(&self, locale: &str, key: &str) -> Option<(&str, &StringEntry)> {
        self.lookup_chain(locale).into_iter().find_map(|source| {
            self.locales
                .get(source)
                .and_then(|strings| strings.get(key))
                .map(|entry| (source, entry))
        })
    }

    /// Raw text for `key`, or `None` when no candidate locale defines it.
    #[must_use]
    pub fn get(&self, locale: &str, key: &str) -> Option<&str> {
        self.lookup(locale, key).map(|(_, entry)| entry.text())
    }

    /// Plural form of `key` for `count`. Simple entries ignore the count.
    ///
    /// An explicit `zero` form is used for a count of 0 whatever category
    /// the locale's rule gives it.
    #[must_use]
    pub fn get_plural(&self, locale: &str, key: &str, count: i64) -> Option<&str> {
        let (source, entry) = self.lookup(locale, key)?;
        Some(match entry {
            StringEntry::Simple(text) => text.as_str(),
            StringEntry::Plural(PluralForms {
                zero: Some(zero), ..
            }) if count == 0 => zero.as_str(),
            StringEntry::Plural(forms) => {
                forms.select(self.plural_rule(source).categorize(count))
            }
        })
    }

    /// `get` followed by `{name}` interpolation.
    #[must_use]
    pub fn format(&self, locale: &str, key: &str, args: &[(&str, &str)]) -> Option<String> {
        self.get(locale, key)
            .map(|template| interpolate(template, args))
    }

    /// `get_plural` followed by interpolation. `{count}` is supplied
    /// automatically unless `args` already binds it.
    #[must_use]
    pub fn format_plural(
        &self,
        locale: &str,
        key: &str,
        count: i64,
        args: &[(&str, &str)],
    ) -> Option<String> {
        let template = self.get_plural(locale, key, count)?;
        let count_text = count.to_string();
        let mut merged: Vec<(&str, &str)> = Vec::with_capacity(args.len() + 1);
        merged.extend_from_slice(args);
        if !args.iter().any(|(name, _)| *name == "count") {
            merged.push(("count", count_text.as_str()));
        }
        Some(interpolate(template, &merged))
    }

    /// Text for `key`, or the key itself when it is missing everywhere.
    #[must_use]
    pub fn translate(&self, locale: &str, key: &str) -> String {
        self.translate_with(locale, key, &[])
    }

    /// Interpolated text for `key`, or the key itself when missing.
    #[must_use]
    pub fn translate_with(&self, locale: &str, key: &str, args: &[(&str, &str)]) -> String {
        match self.format(locale, key, args) {
            Some(text) => text,
            None => self.miss(locale, key),
        }
    }

    /// Pluralized text for `key`, or the key itself when missing.
    #[must_use]
    pub fn translate_plural(
        &self,
        locale: &str,
        key: &str,
        count: i64,
        args: &[(&str, &str)],
    ) -> String {
        match self.format_plural(locale, key, count, args) {
            Some(text) => text,
            None => self.miss(locale, key),
        }
    }

    fn miss(&self, locale: &str, key: &str) -> String {
        let mut reported = self.reported_misses.borrow_mut();
        let pair = (locale.to_string(), key.to_string());
        if reported.contains(&pair) {
            return key.to_string();
        }
        if reported.len() < MAX_REPORTED_MISSES {
            reported.insert(pair);
            warn!(
                locale,
                key,
                fallback = self.fallback_locale.as_deref().unwrap_or("<none>"),
                "translation missing; rendering key"
            );
        } else {
            debug!(locale, key, "translation missing; rendering key");
        }
        key.to_string()
    }

    /// Keys the fallback locale defines that `locale` does not, sorted.
    #[must_use]
    pub fn missing_against_fallback(&self, locale: &str) -> Vec<String> {
        let Some(reference) = self
            .fallback_locale
            .as_deref()
            .and_then(|fallback| self.locales.get(fallback))
        else {
            return Vec::new();
        };
        let target = self.locales.get(locale);
        let mut missing: Vec<String> = reference
            .entries
            .keys()
            .filter(|key| !target.is_some_and(|t| t.contains_key(key)))
            .cloned()
            .collect();
        missing.sort_unstable();
        missing
    }

    /// Coverage of every locale against the union of all keys.
    #[must_use]
    pub fn coverage_report(&self) -> CoverageReport {
        let all_keys: AHashSet<&str> = self
            .locales
            .values()
            .flat_map(|strings| strings.entries.keys().map(String::as_str))
            .collect();
        let total_keys = all_keys.len();

        let mut locales: Vec<LocaleCoverage> = self
            .locales
            .iter()
            .map(|(locale, strings)| {
                let mut missing: Vec<String> = all_keys
                    .iter()
                    .filter(|key| !strings.contains_key(key))
                    .map(|key| key.to_string())
                    .collect();
                missing.sort_unstable();
                let present = total_keys - missing.len();
                let coverage_percent = if total_keys == 0 {
                    100.0
                } else {
                    present as f64 / total_keys as f64 * 100.0
                };
                LocaleCoverage {
                    locale: locale.clone(),
                    present,
                    missing,
                    coverage_percent,
                }
            })
            .collect();
        locales.sort_by(|a, b| a.locale.cmp(&b.locale));

        CoverageReport {
            total_keys,
            locales,
        }
    }
}

/// Substitute `{name}` tokens from `args` in a single pass.
///
/// Unknown tokens are left as-is and substituted text is never rescanned.
/// A `{` without a closing brace is copied literally.
#[must_use]
pub fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find(['{', '}']) {
            Some(close) if after.as_bytes()[close] == b'}' => {
                let name = &after[..close];
                match args.iter().find(|(arg, _)| *arg == name) {
                    Some((_, value)) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Canonical form of a locale tag: `_` becomes `-`, the language is
/// lowercased and a two-letter region uppercased (`en_us` → `en-US`).
#[must_use]
pub fn normalize_locale_tag(tag: &str) -> String {
    let mut parts = tag.trim().split(['-', '_']).filter(|part| !part.is_empty());
    let Some(language) = parts.next() else {
        return String::new();
    };
    let mut out = language.to_ascii_lowercase();
    for part in parts {
        out.push('-');
        if part.len() == 2 && part.chars().all(|c| c.is_ascii_alphabetic()) {
            out.push_str(&part.to_ascii_uppercase());
        } else if part.len() == 4 && part.chars().all(|c| c.is_ascii_alphabetic()) {
            // Script subtag, title case (`Hant`).
            let (head, tail) = part.split_at(1);
            out.push_str(&head.to_ascii_uppercase());
            out.push_str(&tail.to_ascii_lowercase());
        } else {
            out.push_str(part);
        }
    }
    out
}

/// Language subtag of a (normalized or raw) tag.
#[must_use]
pub fn language_of(tag: &str) -> &str {
    tag.split(['-', '_']).next().unwrap_or(tag)
}
