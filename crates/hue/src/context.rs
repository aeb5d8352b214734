#![forbid(unsafe_code)]

//! Everything a UI needs to render: settings, themes, translations, host.
//!
//! [`AppContext`] reads the settings holder on every call, so the theme and
//! strings it hands out always reflect the latest setter call (and, for
//! `ThemeMode::System`, the latest host preference).

use std::rc::Rc;

use hue_i18n::{StringCatalog, load_dir};
use hue_runtime::{HostAppearance, HueConfig, Locale, SettingsController, TextDirection};
use hue_style::{Brightness, Theme, ThemeSet};
use tracing::{info, info_span, warn};

use crate::error::Result;

/// Settings, themes, translations and host preference bundled together.
///
/// Clones share the settings, the catalog and the host preference.
#[derive(Debug, Clone)]
pub struct AppContext {
    settings: SettingsController,
    themes: ThemeSet,
    catalog: Rc<StringCatalog>,
    host: HostAppearance,
}

impl AppContext {
    #[must_use]
    pub fn new(
        settings: SettingsController,
        themes: ThemeSet,
        catalog: StringCatalog,
        host: HostAppearance,
    ) -> Self {
        Self {
            settings,
            themes,
            catalog: Rc::new(catalog),
            host,
        }
    }

    /// Load translations and build settings as `config` describes.
    ///
    /// `config.translations.path` is used as-is. [`HueConfig::load`] has
    /// already resolved a relative path against the config file's directory;
    /// for a config built in memory a relative path is relative to the
    /// working directory. Supported locales without any translations are
    /// reported, not rejected: they render through the fallback locale.
    pub fn from_config(config: &HueConfig, host: HostAppearance) -> Result<Self> {
        let _span = info_span!("hue.startup").entered();

        let errors = config.validate();
        if !errors.is_empty() {
            return Err(hue_runtime::ConfigError::Validation(errors).into());
        }

        let settings = config.settings_controller()?;
        let mut catalog = load_dir(&config.translations.path)?;
        catalog.set_fallback_locale(settings.fallback_locale().as_str());

        if !catalog.has_locale(settings.fallback_locale().as_str()) {
            warn!(
                fallback = settings.fallback_locale().as_str(),
                "fallback locale has no translations"
            );
        }
        for locale in settings.supported_locales() {
            if !catalog.has_locale(locale.as_str()) {
                warn!(locale = locale.as_str(), "supported locale has no translations");
            }
            let missing = catalog.missing_against_fallback(locale.as_str());
            if !missing.is_empty() {
                warn!(
                    locale = locale.as_str(),
                    missing = missing.len(),
                    "locale is missing keys; fallback text will be shown"
                );
            }
        }

        info!(
            locales = catalog.locales().len(),
            locale = settings.locale().as_str(),
            theme_mode = settings.theme_mode().as_str(),
            "app context ready"
        );
        Ok(Self::new(settings, config.theme_set(), catalog, host))
    }

    #[must_use]
    pub fn settings(&self) -> &SettingsController {
        &self.settings
    }

    #[must_use]
    pub fn themes(&self) -> &ThemeSet {
        &self.themes
    }

    #[must_use]
    pub fn catalog(&self) -> &StringCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn host(&self) -> &HostAppearance {
        &self.host
    }

    /// Theme to render with right now.
    #[must_use]
    pub fn theme(&self) -> &Theme {
        self.themes.resolve(self.settings.theme_mode(), &self.host)
    }

    #[must_use]
    pub fn brightness(&self) -> Brightness {
        self.settings.resolved_brightness(&self.host)
    }

    #[must_use]
    pub fn locale(&self) -> Locale {
        self.settings.locale()
    }

    #[must_use]
    pub fn text_direction(&self) -> TextDirection {
        self.settings.locale().direction()
    }

    /// Text for `key` in the current locale.
    #[must_use]
    pub fn tr(&self, key: &str) -> String {
        self.catalog.translate(self.settings.locale().as_str(), key)
    }

    /// Interpolated text for `key` in the current locale.
    #[must_use]
    pub fn tr_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        self.catalog
            .translate_with(self.settings.locale().as_str(), key, args)
    }

    /// Pluralized text for `key` in the current locale. `{count}` is bound
    /// automatically.
    #[must_use]
    pub fn tr_plural(&self, key: &str, count: i64, args: &[(&str, &str)]) -> String {
        self.catalog
            .translate_plural(self.settings.locale().as_str(), key, count, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hue_i18n::{LocaleStrings, PluralForms};
    use hue_style::ThemeMode;

    fn context() -> AppContext {
        let mut en = LocaleStrings::new();
        en.insert("settings.title", "Settings");
        en.insert("home.greeting", "Hello {name}");
        en.insert_plural(
            "home.inbox",
            PluralForms::new("You have {count} new message", "You have {count} new messages"),
        );
        let mut ar = LocaleStrings::new();
        ar.insert("settings.title", "الإعدادات");

        let mut catalog = StringCatalog::new().with_fallback_locale("en");
        catalog.add_locale("en", en);
        catalog.add_locale("ar", ar);

        let en = Locale::parse("en").unwrap();
        let settings = SettingsController::new(ThemeMode::System, en.clone())
            .with_supported_locales(vec![en.clone(), Locale::parse("ar").unwrap()], en);
        AppContext::new(
            settings,
            ThemeSet::default(),
            catalog,
            HostAppearance::new(Brightness::Light),
        )
    }

    #[test]
    fn theme_follows_settings_and_host() {
        let ctx = context();
        assert_eq!(ctx.theme().brightness, Brightness::Light);

        ctx.host().set_brightness(Brightness::Dark);
        assert_eq!(ctx.theme().brightness, Brightness::Dark);

        ctx.settings().set_theme_mode(ThemeMode::Light);
        assert_eq!(ctx.theme().brightness, Brightness::Light);
        assert_eq!(ctx.brightness(), Brightness::Light);
    }

    #[test]
    fn strings_follow_locale() {
        let ctx = context();
        assert_eq!(ctx.tr("settings.title"), "Settings");
        assert_eq!(ctx.text_direction(), TextDirection::Ltr);

        ctx.settings().set_locale(Locale::parse("ar").unwrap());
        assert_eq!(ctx.tr("settings.title"), "الإعدادات");
        assert_eq!(ctx.text_direction(), TextDirection::Rtl);
        // Not translated into Arabic: English text.
        assert_eq!(ctx.tr_with("home.greeting", &[("name", "Sam")]), "Hello Sam");
        assert_eq!(ctx.tr("no.such.key"), "no.such.key");
    }

    #[test]
    fn plural_messages() {
        let ctx = context();
        assert_eq!(ctx.tr_plural("home.inbox", 1, &[]), "You have 1 new message");
        assert_eq!(ctx.tr_plural("home.inbox", 5, &[]), "You have 5 new messages");
    }

    #[test]
    fn clones_share_settings() {
        let ctx = context();
        let other = ctx.clone();
        other.settings().set_theme_mode(ThemeMode::Dark);
        assert_eq!(ctx.theme().brightness, Brightness::Dark);
    }
}
