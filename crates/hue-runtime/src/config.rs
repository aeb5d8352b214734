#![forbid(unsafe_code)]

//! Startup configuration loaded from TOML or JSON.
//!
//! # Loading
//!
//! ```toml
//! # hue.toml
//! [settings]
//! theme_mode = "system"
//! locale = "en"
//! fallback_locale = "en"
//! supported_locales = ["en", "ar"]
//!
//! [translations]
//! path = "assets/translations"
//!
//! [themes.dark]
//! brightness = "dark"
//! primary = "#90caf9"
//! card = "#1e1e1e"
//! background = "#121212"
//! text = "#e0e0e0"
//! ```
//!
//! ```rust,ignore
//! let config = HueConfig::load("hue.toml")?.validated()?;
//! let settings = config.settings_controller()?;
//! ```
//!
//! # Defaults
//!
//! Every section is optional. An empty file yields `system` theme mode, the
//! host locale (or `en`), no locale restriction, and the built-in light and
//! dark themes. Unknown keys are rejected so typos surface at startup.

use std::path::{Path, PathBuf};

use hue_style::{Theme, ThemeDocument, ThemeMode, ThemeSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::locale::{Locale, detect_system_locale};
use crate::settings::SettingsController;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HueConfig {
    pub settings: SettingsConfig,
    pub translations: TranslationsConfig,
    pub themes: ThemesConfig,
}

/// Initial values for the settings holder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsConfig {
    pub theme_mode: ThemeMode,
    /// `None` means "detect from the environment".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    pub fallback_locale: String,
    /// Empty means every locale is accepted.
    pub supported_locales: Vec<String>,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            theme_mode: ThemeMode::System,
            locale: None,
            fallback_locale: "en".into(),
            supported_locales: Vec::new(),
        }
    }
}

/// Where translation files live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranslationsConfig {
    /// Relative paths are resolved against the config file's directory.
    pub path: PathBuf,
}

impl Default for TranslationsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("assets/translations"),
        }
    }
}

/// Optional replacements for the built-in theme descriptors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemesConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light: Option<ThemeDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dark: Option<ThemeDocument>,
}

impl HueConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&read(path.as_ref())?)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json_str(&read(path.as_ref())?)
    }

    /// Load by extension: `.json` is JSON, anything else TOML.
    ///
    /// A relative translations path is rebased onto the file's directory,
    /// so the returned path is ready to use from the current working
    /// directory. Nothing downstream rebases it again.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let mut config = if is_json {
            Self::from_json_file(path)?
        } else {
            Self::from_toml_file(path)?
        };
        if let Some(dir) = path.parent() {
            config.translations.path = config.translations_dir(dir);
        }
        info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::TomlSerialize)
    }

    /// Every problem found, as human-readable messages. Empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let settings = &self.settings;

        if let Some(locale) = &settings.locale
            && Locale::parse(locale).is_err()
        {
            errors.push(format!("settings.locale {locale:?} is not a locale tag"));
        }

        let fallback = Locale::parse(&settings.fallback_locale).ok();
        if fallback.is_none() {
            errors.push(format!(
                "settings.fallback_locale {:?} is not a locale tag",
                settings.fallback_locale
            ));
        }

        let mut supported = Vec::with_capacity(settings.supported_locales.len());
        for tag in &settings.supported_locales {
            match Locale::parse(tag) {
                Ok(locale) if supported.contains(&locale) => {
                    errors.push(format!("settings.supported_locales lists {locale} twice"));
                }
                Ok(locale) => supported.push(locale),
                Err(_) => errors.push(format!(
                    "settings.supported_locales entry {tag:?} is not a locale tag"
                )),
            }
        }
        if let Some(fallback) = fallback
            && !supported.is_empty()
            && !supported.contains(&fallback)
        {
            errors.push(format!(
                "settings.fallback_locale {fallback} must be listed in settings.supported_locales"
            ));
        }

        if self.translations.path.as_os_str().is_empty() {
            errors.push("translations.path must not be empty".into());
        }

        for (slot, doc) in [("light", &self.themes.light), ("dark", &self.themes.dark)] {
            if let Some(doc) = doc
                && doc.brightness.as_str() != slot
            {
                errors.push(format!(
                    "themes.{slot}.brightness is {:?}",
                    doc.brightness.as_str()
                ));
            }
        }

        errors
    }

    /// `self`, or every [`Self::validate`] message as one error.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Translations directory, resolving a relative path against `base`.
    #[must_use]
    pub fn translations_dir(&self, base: &Path) -> PathBuf {
        if self.translations.path.is_absolute() {
            self.translations.path.clone()
        } else {
            base.join(&self.translations.path)
        }
    }

    /// The light/dark pair, with configured overrides applied.
    #[must_use]
    pub fn theme_set(&self) -> ThemeSet {
        let pick = |doc: &Option<ThemeDocument>, builtin: Theme| {
            doc.clone().map_or(builtin, Theme::from)
        };
        ThemeSet::new(
            pick(&self.themes.light, Theme::light()),
            pick(&self.themes.dark, Theme::dark()),
        )
    }

    /// Build the settings holder this configuration describes.
    ///
    /// Without a configured locale the host locale is used, then the
    /// fallback locale.
    pub fn settings_controller(&self) -> Result<SettingsController, ConfigError> {
        let settings = &self.settings;
        let fallback = parse_locale("settings.fallback_locale", &settings.fallback_locale)?;
        let locale = match &settings.locale {
            Some(tag) => parse_locale("settings.locale", tag)?,
            None => detect_system_locale().unwrap_or_else(|| fallback.clone()),
        };
        let supported = settings
            .supported_locales
            .iter()
            .map(|tag| parse_locale("settings.supported_locales", tag))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            theme_mode = settings.theme_mode.as_str(),
            locale = locale.as_str(),
            fallback = fallback.as_str(),
            supported = supported.len(),
            "settings initialised from configuration"
        );
        Ok(SettingsController::new(settings.theme_mode, locale)
            .with_supported_locales(supported, fallback))
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_locale(field: &str, tag: &str) -> Result<Locale, ConfigError> {
    Locale::parse(tag).map_err(|err| ConfigError::Validation(vec![format!("{field}: {err}")]))
}

/// Errors from loading a configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Toml(toml::de::Error),
    TomlSerialize(toml::ser::Error),
    Json(serde_json::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "reading {}: {source}", path.display()),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::TomlSerialize(e) => write!(f, "TOML serialize error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => write!(f, "invalid configuration: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Toml(e) => Some(e),
            Self::TomlSerialize(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
