#![forbid(unsafe_code)]

//! JSON translation files.
//!
//! # Format
//!
//! One UTF-8 JSON document per locale. Objects nest arbitrarily; leaf paths
//! become dotted keys.
//!
//! ```json
//! {
//!   "settings": {
//!     "title": "Settings",
//!     "inbox": "You have {count} new message | You have {count} new messages",
//!     "files": { "zero": "No files", "one": "One file", "other": "{count} files" }
//!   }
//! }
//! ```
//!
//! - A string leaf containing `|` is a plural entry: two parts are
//!   `one | other`, three parts are `zero | one | other`.
//! - An object whose keys are all plural keywords (`zero`, `one`, `two`,
//!   `few`, `many`, `other`) is a plural entry and must include `other`.
//! - Numbers and booleans are stored as their JSON text.
//! - Arrays and `null` are rejected.
//!
//! # Layout
//!
//! [`load_dir`] accepts a flat directory (`en.json`, `ar.json`) and/or one
//! level of feature subdirectories (`home/en.json`). Keys loaded from a
//! feature directory are prefixed with the directory name, so `title` in
//! `home/en.json` is looked up as `home.title`.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, info_span, trace, warn};

use crate::catalog::{LocaleStrings, StringCatalog, StringEntry, normalize_locale_tag};
use crate::error::I18nError;
use crate::plural::{PluralCategory, PluralForms};

/// Parse one locale document from text.
pub fn parse_locale_json(locale: &str, text: &str) -> Result<LocaleStrings, I18nError> {
    let value: Value = serde_json::from_str(text).map_err(|source| I18nError::Parse {
        path: None,
        locale: locale.to_string(),
        source,
    })?;
    parse_locale_value(locale, &value)
}

/// Flatten an already parsed document.
pub fn parse_locale_value(locale: &str, value: &Value) -> Result<LocaleStrings, I18nError> {
    let Value::Object(root) = value else {
        return Err(I18nError::NotAnObject {
            path: None,
            locale: locale.to_string(),
        });
    };
    let mut strings = LocaleStrings::new();
    for (key, child) in root {
        flatten(locale, key, child, &mut strings)?;
    }
    Ok(strings)
}

fn flatten(
    locale: &str,
    path: &str,
    value: &Value,
    out: &mut LocaleStrings,
) -> Result<(), I18nError> {
    let invalid = |reason: &str| I18nError::InvalidEntry {
        path: None,
        locale: locale.to_string(),
        key: path.to_string(),
        reason: reason.to_string(),
    };

    match value {
        Value::String(text) => {
            out.insert_entry(path, parse_leaf(text).map_err(|reason| invalid(&reason))?);
        }
        Value::Number(number) => {
            out.insert(path, number.to_string());
        }
        Value::Bool(flag) => {
            out.insert(path, flag.to_string());
        }
        Value::Object(map) if is_plural_object(map) => {
            let mut forms = PluralForms::default();
            let mut has_one = false;
            for (keyword, text) in map {
                let Value::String(text) = text else {
                    return Err(invalid("plural forms must be strings"));
                };
                if let Some(category) = PluralCategory::from_keyword(keyword) {
                    has_one |= category == PluralCategory::One;
                    forms.set(category, text.as_str());
                }
            }
            if !map.contains_key("other") {
                return Err(invalid("plural object needs an `other` form"));
            }
            if !has_one {
                forms.one = forms.other.clone();
            }
            out.insert_plural(path, forms);
        }
        Value::Object(map) => {
            if map.is_empty() {
                trace!(locale, key = path, "empty translation group");
            }
            for (key, child) in map {
                let child_path = format!("{path}.{key}");
                flatten(locale, &child_path, child, out)?;
            }
        }
        Value::Array(_) => return Err(invalid("arrays are not supported")),
        Value::Null => return Err(invalid("null is not a translation")),
    }
    Ok(())
}

fn is_plural_object(map: &serde_json::Map<String, Value>) -> bool {
    !map.is_empty()
        && map
            .keys()
            .all(|key| PluralCategory::from_keyword(key).is_some())
}

/// Turn a string leaf into an entry, splitting pipe-separated plural forms.
fn parse_leaf(text: &str) -> Result<StringEntry, String> {
    if !text.contains('|') {
        return Ok(StringEntry::Simple(text.to_string()));
    }
    let parts: Vec<&str> = text.split('|').map(str::trim).collect();
    match parts.as_slice() {
        [one, other] => Ok(StringEntry::Plural(PluralForms::new(*one, *other))),
        [zero, one, other] => Ok(StringEntry::Plural(
            PluralForms::new(*one, *other).with_zero(*zero),
        )),
        _ => Err(format!(
            "expected 2 or 3 pipe-separated plural forms, found {}",
            parts.len()
        )),
    }
}

/// Load a single locale file. The locale is given by the caller.
pub fn load_file(path: impl AsRef<Path>, locale: &str) -> Result<LocaleStrings, I18nError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| I18nError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let strings = parse_locale_json(locale, &text).map_err(|err| err.with_path(path))?;
    debug!(
        path = %path.display(),
        locale,
        entries = strings.len(),
        "translation file loaded"
    );
    Ok(strings)
}

/// Locale named by a `<locale>.json` file, or `None` for other files.
fn locale_of(path: &Path) -> Option<String> {
    if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let locale = normalize_locale_tag(stem);
    (!locale.is_empty()).then_some(locale)
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, I18nError> {
    let io = |source| I18nError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io)? {
        paths.push(entry.map_err(io)?.path());
    }
    paths.sort();
    Ok(paths)
}

/// Load every translation file under `dir` into a new catalog.
///
/// The catalog has no fallback locale set; callers choose it.
pub fn load_dir(dir: impl AsRef<Path>) -> Result<StringCatalog, I18nError> {
    let dir = dir.as_ref();
    let _span = info_span!("i18n.load_dir", path = %dir.display()).entered();

    let mut catalog = StringCatalog::new();
    let mut files = 0usize;

    for path in sorted_entries(dir)? {
        if path.is_dir() {
            let Some(feature) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            for file in sorted_entries(&path)? {
                let Some(locale) = locale_of(&file) else {
                    trace!(path = %file.display(), "skipping non-translation file");
                    continue;
                };
                let strings = load_file(&file, &locale)?;
                let mut prefixed = LocaleStrings::new();
                let overwritten = prefixed.merge(strings, Some(feature));
                debug_assert!(overwritten.is_empty());
                add_checked(&mut catalog, &locale, prefixed, &file);
                files += 1;
            }
        } else if let Some(locale) = locale_of(&path) {
            let strings = load_file(&path, &locale)?;
            add_checked(&mut catalog, &locale, strings, &path);
            files += 1;
        } else {
            trace!(path = %path.display(), "skipping non-translation file");
        }
    }

    if files == 0 {
        return Err(I18nError::NoTranslations {
            path: dir.to_path_buf(),
        });
    }

    info!(
        files,
        locales = catalog.locales().len(),
        "translations loaded"
    );
    Ok(catalog)
}

fn add_checked(catalog: &mut StringCatalog, locale: &str, strings: LocaleStrings, file: &Path) {
    if let Some(existing) = catalog.strings(locale) {
        let clashes: Vec<&str> = strings
            .keys()
            .into_iter()
            .filter(|key| existing.contains_key(key))
            .collect();
        if !clashes.is_empty() {
            warn!(
                locale,
                path = %file.display(),
                keys = ?clashes,
                "translation keys redefined; later file wins"
            );
        }
    }
    catalog.add_locale(locale, strings);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_objects_flatten_to_dotted_keys() {
        let strings = parse_locale_json(
            "en",
            r#"{"settings": {"title": "Settings", "theme": {"dark": "Dark mode"}}}"#,
        )
        .expect("valid document");
        assert_eq!(strings.keys(), vec!["settings.theme.dark", "settings.title"]);
        assert_eq!(
            strings.get("settings.theme.dark"),
            Some(&StringEntry::from("Dark mode"))
        );
    }

    #[test]
    fn pipe_pair_becomes_plural() {
        let strings = parse_locale_json(
            "en",
            r#"{"inbox": "You have {count} new message | You have {count} new messages"}"#,
        )
        .expect("valid document");
        assert_eq!(
            strings.get("inbox"),
            Some(&StringEntry::Plural(PluralForms::new(
                "You have {count} new message",
                "You have {count} new messages"
            )))
        );
    }

    #[test]
    fn pipe_triple_has_zero_form() {
        let strings =
            parse_locale_json("en", r#"{"files": "No files | One file | {count} files"}"#)
                .expect("valid document");
        let Some(StringEntry::Plural(forms)) = strings.get("files") else {
            panic!("expected plural entry");
        };
        assert_eq!(forms.zero.as_deref(), Some("No files"));
        assert_eq!(forms.one, "One file");
        assert_eq!(forms.other, "{count} files");
    }

    #[test]
    fn pipe_triple_renders_zero_form_at_zero() {
        let strings = parse_locale_json(
            "en",
            r#"{"inbox": "No new messages | You have {count} new message | You have {count} new messages"}"#,
        )
        .expect("valid document");
        let mut catalog = StringCatalog::new();
        catalog.add_locale("en", strings);

        let render = |count| catalog.format_plural("en", "inbox", count, &[]);
        assert_eq!(render(0).as_deref(), Some("No new messages"));
        assert_eq!(render(1).as_deref(), Some("You have 1 new message"));
        assert_eq!(render(7).as_deref(), Some("You have 7 new messages"));
    }

    #[test]
    fn too_many_pipes_is_rejected() {
        let err = parse_locale_json("en", r#"{"x": "a | b | c | d"}"#).unwrap_err();
        assert!(matches!(err, I18nError::InvalidEntry { ref key, .. } if key == "x"));
    }

    #[test]
    fn plural_object_is_recognised() {
        let strings = parse_locale_json(
            "ar",
            r#"{"items": {"zero": "لا عناصر", "one": "عنصر واحد", "two": "عنصران", "few": "{count} عناصر", "other": "{count} عنصر"}}"#,
        )
        .expect("valid document");
        let Some(StringEntry::Plural(forms)) = strings.get("items") else {
            panic!("expected plural entry");
        };
        assert_eq!(forms.two.as_deref(), Some("عنصران"));
        assert_eq!(forms.select(PluralCategory::Few), "{count} عناصر");
    }

    #[test]
    fn plural_object_without_other_is_rejected() {
        let err = parse_locale_json("en", r#"{"items": {"one": "item"}}"#).unwrap_err();
        assert!(err.to_string().contains("other"));
    }

    #[test]
    fn plural_object_without_one_uses_other() {
        let strings =
            parse_locale_json("ja", r#"{"items": {"other": "{count} 件"}}"#).expect("valid");
        let Some(StringEntry::Plural(forms)) = strings.get("items") else {
            panic!("expected plural entry");
        };
        assert_eq!(forms.one, "{count} 件");
    }

    #[test]
    fn scalars_are_stringified() {
        let strings = parse_locale_json("en", r#"{"n": 3, "b": true}"#).expect("valid");
        assert_eq!(strings.get("n"), Some(&StringEntry::from("3")));
        assert_eq!(strings.get("b"), Some(&StringEntry::from("true")));
    }

    #[test]
    fn arrays_and_null_are_rejected() {
        assert!(parse_locale_json("en", r#"{"a": ["x"]}"#).is_err());
        assert!(parse_locale_json("en", r#"{"a": {"b": null}}"#).is_err());
    }

    #[test]
    fn non_object_root_is_rejected() {
        let err = parse_locale_json("en", r#""just a string""#).unwrap_err();
        assert!(matches!(err, I18nError::NotAnObject { .. }));
    }

    #[test]
    fn malformed_json_names_locale() {
        let err = parse_locale_json("ar", "{ not json").unwrap_err();
        assert_eq!(err.locale(), Some("ar"));
        assert!(err.to_string().contains("'ar'"));
    }

    #[test]
    fn locale_from_file_name() {
        assert_eq!(locale_of(Path::new("a/en_US.json")), Some("en-US".to_string()));
        assert_eq!(locale_of(Path::new("a/ar.json")), Some("ar".to_string()));
        assert_eq!(locale_of(Path::new("a/README.md")), None);
        assert_eq!(locale_of(Path::new("a/.json")), None);
    }
}
