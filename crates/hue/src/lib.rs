#![forbid(unsafe_code)]

//! Hue public facade crate.
//!
//! Re-exports the types an application needs from the internal crates,
//! plus the glue that ties them together: [`AppContext`] (settings, themes,
//! translations and host preference in one handle), the settings screen
//! model in [`settings_view`], and the unified [`Error`].
//!
//! ```rust,ignore
//! use hue::prelude::*;
//!
//! let config = HueConfig::load("hue.toml")?;
//! let ctx = AppContext::from_config(&config, HostAppearance::default())?;
//! let mut screen = SettingsView::new(ctx);
//! screen.update(SettingsMsg::ToggleDark(true));
//! draw(screen.view());
//! ```

pub mod context;
pub mod error;
pub mod settings_view;

pub use context::AppContext;
pub use error::{Error, Result};
pub use settings_view::{LocaleOption, SettingsMsg, SettingsScreen, SettingsView};

// --- Style re-exports ------------------------------------------------------

pub use hue_style::{
    Brightness, HostPreference, Rgb, Theme, ThemeBuilder, ThemeDocument, ThemeError,
    ThemeExtension, ThemeMode, ThemeSet,
};

// --- i18n re-exports -------------------------------------------------------

pub use hue_i18n::{
    I18nError, LocaleStrings, PluralCategory, PluralForms, PluralRule, StringCatalog,
    StringEntry,
};

// --- Runtime re-exports ----------------------------------------------------

pub use hue_runtime::{
    BatchScope, ConfigError, HostAppearance, HueConfig, Locale, LocaleError, Observable,
    SettingsChange, SettingsController, Subscription, TextDirection, detect_system_locale,
};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        AppContext, Brightness, Error, HostAppearance, HueConfig, Locale, Result, SettingsChange,
        SettingsController, SettingsMsg, SettingsView, StringCatalog, Theme, ThemeMode, ThemeSet,
    };

    pub use crate::{i18n, runtime, style};
}

pub use hue_i18n as i18n;
pub use hue_runtime as runtime;
pub use hue_style as style;
