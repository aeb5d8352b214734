#![forbid(unsafe_code)]

//! The settings holder: current theme mode and locale.
//!
//! # Contract
//!
//! - Reads ([`SettingsController::theme_mode`], [`SettingsController::locale`])
//!   are cheap and side-effect free; they are meant to be called on every
//!   render.
//! - Each setter call stores the value and notifies every registered
//!   observer exactly once, synchronously and in registration order, even
//!   when the new value equals the old one. Inside a
//!   [`BatchScope`](crate::reactive::BatchScope) the notifications are
//!   deferred and coalesced per observer.
//! - `ThemeMode::System` is stored as-is. The resolved light/dark value is
//!   never written back.
//! - When a supported-locale list is configured, `set_locale` maps tags
//!   outside it to the closest supported locale (same language) or to the
//!   fallback locale.

use std::rc::Rc;

use hue_style::{Brightness, HostPreference, ThemeMode};
use tracing::{debug, info, warn};

use crate::locale::Locale;
use crate::reactive::{Observable, Subscription};

/// What a setter call changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsChange {
    ThemeMode(ThemeMode),
    Locale(Locale),
}

/// Observable theme-mode and locale settings.
///
/// Clones share state: a change made through one handle is visible to, and
/// notifies observers registered through, every other handle.
#[derive(Debug, Clone)]
pub struct SettingsController {
    theme_mode: Observable<ThemeMode>,
    locale: Observable<Locale>,
    supported: Vec<Locale>,
    fallback: Locale,
}

impl SettingsController {
    /// Settings with no locale restriction. `locale` doubles as the fallback.
    #[must_use]
    pub fn new(theme_mode: ThemeMode, locale: Locale) -> Self {
        Self {
            theme_mode: Observable::new(theme_mode),
            fallback: locale.clone(),
            locale: Observable::new(locale),
            supported: Vec::new(),
        }
    }

    /// Restrict locales to `supported`, mapping everything else to
    /// `fallback`. The current locale is re-mapped without notifying.
    #[must_use]
    pub fn with_supported_locales(mut self, supported: Vec<Locale>, fallback: Locale) -> Self {
        self.supported = supported;
        if !self.supported.is_empty() && !self.supported.contains(&fallback) {
            warn!(
                fallback = fallback.as_str(),
                "fallback locale is not in the supported list; adding it"
            );
            self.supported.push(fallback.clone());
        }
        self.fallback = fallback;
        let current = self.locale.get();
        let mapped = self.supported_locale_for(&current);
        if mapped != current {
            self.locale = Observable::new(mapped);
        }
        self
    }

    #[must_use]
    pub fn theme_mode(&self) -> ThemeMode {
        self.theme_mode.get()
    }

    #[must_use]
    pub fn locale(&self) -> Locale {
        self.locale.get()
    }

    #[must_use]
    pub fn fallback_locale(&self) -> &Locale {
        &self.fallback
    }

    /// Supported locales in configuration order. Empty means unrestricted.
    #[must_use]
    pub fn supported_locales(&self) -> &[Locale] {
        &self.supported
    }

    /// Brightness to render with right now. `System` asks `host`.
    #[must_use]
    pub fn resolved_brightness(&self, host: &dyn HostPreference) -> Brightness {
        self.theme_mode().brightness(host)
    }

    /// Replace the theme mode and notify observers.
    pub fn set_theme_mode(&self, mode: ThemeMode) {
        let previous = self.theme_mode.get();
        info!(
            from = previous.as_str(),
            to = mode.as_str(),
            "theme mode set"
        );
        self.theme_mode.publish(mode);
    }

    /// Replace the locale and notify observers. Returns the locale actually
    /// stored, which differs from `locale` when it is not supported.
    pub fn set_locale(&self, locale: Locale) -> Locale {
        let effective = self.supported_locale_for(&locale);
        if effective != locale {
            warn!(
                requested = locale.as_str(),
                using = effective.as_str(),
                "unsupported locale requested"
            );
        }
        let previous = self.locale.get();
        info!(
            from = previous.as_str(),
            to = effective.as_str(),
            "locale set"
        );
        self.locale.publish(effective.clone());
        effective
    }

    /// Observe both settings.
    pub fn subscribe(&self, callback: impl Fn(&SettingsChange) + 'static) -> Subscription {
        let on_mode = Rc::new(callback);
        let on_locale = Rc::clone(&on_mode);
        Subscription::combine(vec![
            self.theme_mode
                .subscribe(move |mode| (*on_mode)(&SettingsChange::ThemeMode(*mode))),
            self.locale
                .subscribe(move |locale| (*on_locale)(&SettingsChange::Locale(locale.clone()))),
        ])
    }

    /// Observe theme-mode changes only.
    pub fn on_theme_mode(&self, callback: impl Fn(ThemeMode) + 'static) -> Subscription {
        self.theme_mode.subscribe(move |mode| callback(*mode))
    }

    /// Observe locale changes only.
    pub fn on_locale(&self, callback: impl Fn(&Locale) + 'static) -> Subscription {
        self.locale.subscribe(callback)
    }

    /// Number of setter calls so far, across both settings.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.theme_mode.version() + self.locale.version()
    }

    fn supported_locale_for(&self, requested: &Locale) -> Locale {
        if self.supported.is_empty() || self.supported.contains(requested) {
            return requested.clone();
        }
        let language = requested.language_only();
        if let Some(found) = self
            .supported
            .iter()
            .find(|candidate| **candidate == language)
            .or_else(|| {
                self.supported
                    .iter()
                    .find(|candidate| candidate.language() == requested.language())
            })
        {
            debug!(
                requested = requested.as_str(),
                matched = found.as_str(),
                "locale matched by language"
            );
            return found.clone();
        }
        self.fallback.clone()
    }
}
