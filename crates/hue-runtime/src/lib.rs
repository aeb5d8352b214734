#![forbid(unsafe_code)]

//! Hue Runtime
//!
//! Observable application settings and the pieces around them.
//!
//! # Key Components
//!
//! - [`SettingsController`] - current theme mode and locale, with setters
//!   that notify observers
//! - [`Observable`] / [`BatchScope`] - the change-notification primitives
//!   the controller is built on
//! - [`HostAppearance`] - the host's light/dark preference, consulted live
//!   for `ThemeMode::System`
//! - [`Locale`] - canonical locale tags, text direction, system detection
//! - [`HueConfig`] - startup configuration from TOML or JSON (`config`
//!   feature, on by default)
//!
//! # How it fits in the system
//! `hue-runtime` sits between the data crates (`hue-style`, `hue-i18n`) and
//! the UI. It holds *which* theme mode and locale are active; the data
//! crates turn those into colors and text.
//!
//! Everything here is single-threaded: handles are `Rc`-based and `!Send`.

#[cfg(feature = "config")]
pub mod config;
pub mod host;
pub mod locale;
pub mod reactive;
pub mod settings;

#[cfg(feature = "config")]
pub use config::{ConfigError, HueConfig, SettingsConfig, ThemesConfig, TranslationsConfig};
pub use host::HostAppearance;
pub use locale::{
    LOCALE_ENV_VARS, Locale, LocaleError, TextDirection, detect_locale_with,
    detect_system_locale,
};
pub use reactive::{BatchScope, Observable, Subscription};
pub use settings::{SettingsChange, SettingsController};
