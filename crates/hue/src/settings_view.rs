#![forbid(unsafe_code)]

//! Elm-style model for a settings screen: a language dropdown and a dark
//! mode switch.
//!
//! [`SettingsView::update`] turns user input ([`SettingsMsg`]) into setter
//! calls on the settings holder; [`SettingsView::view`] reads the current
//! state back into a [`SettingsScreen`] that a renderer can draw. The model
//! keeps no copy of the theme mode or locale, so a change made elsewhere
//! (another screen, the host) shows up on the next `view`.

use std::cell::Cell;
use std::rc::Rc;

use hue_runtime::{Locale, Subscription, TextDirection};
use hue_style::{Brightness, Theme, ThemeMode};
use tracing::debug;

use crate::context::AppContext;

/// Catalog keys the screen reads.
pub mod keys {
    pub const TITLE: &str = "settings.title";
    pub const LANGUAGE: &str = "settings.language";
    pub const DARK_MODE: &str = "settings.dark_mode";
    pub const FOLLOW_SYSTEM: &str = "settings.follow_system";
    /// Each locale's name for itself, used for dropdown labels.
    pub const LANGUAGE_NAME: &str = "settings.language_name";
}

/// User input on the settings screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsMsg {
    /// A dropdown entry was picked.
    SelectLocale(Locale),
    /// The dark mode switch was flipped.
    ToggleDark(bool),
    /// "Follow system" was chosen.
    FollowSystem,
}

/// One dropdown entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleOption {
    pub locale: Locale,
    pub label: String,
    pub selected: bool,
}

/// Everything needed to draw the screen once.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsScreen {
    pub title: String,
    pub direction: TextDirection,
    pub theme: Theme,
    pub language_label: String,
    pub locale_options: Vec<LocaleOption>,
    pub dark_mode_label: String,
    /// Switch position: on when the rendered theme is dark.
    pub dark_mode_on: bool,
    pub follow_system_label: String,
    pub following_system: bool,
}

/// The settings screen model.
#[derive(Debug)]
pub struct SettingsView {
    ctx: AppContext,
    options: Vec<Locale>,
    dirty: Rc<Cell<bool>>,
    _watch: Subscription,
}

impl SettingsView {
    /// Dropdown entries are the supported locales, or every catalog locale
    /// when the settings are unrestricted.
    #[must_use]
    pub fn new(ctx: AppContext) -> Self {
        let mut options = ctx.settings().supported_locales().to_vec();
        if options.is_empty() {
            options = ctx
                .catalog()
                .locales()
                .into_iter()
                .filter_map(|tag| Locale::parse(tag).ok())
                .collect();
        }

        let dirty = Rc::new(Cell::new(true));
        let on_settings = Rc::clone(&dirty);
        let on_host = Rc::clone(&dirty);
        let watch = Subscription::combine(vec![
            ctx.settings().subscribe(move |_| on_settings.set(true)),
            ctx.host().subscribe(move |_| on_host.set(true)),
        ]);

        Self {
            ctx,
            options,
            dirty,
            _watch: watch,
        }
    }

    #[must_use]
    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    /// True when something changed since the last [`Self::view`].
    #[must_use]
    pub fn needs_render(&self) -> bool {
        self.dirty.get()
    }

    pub fn update(&mut self, msg: SettingsMsg) {
        debug!(?msg, "settings message");
        let settings = self.ctx.settings();
        match msg {
            SettingsMsg::SelectLocale(locale) => {
                settings.set_locale(locale);
            }
            SettingsMsg::ToggleDark(on) => {
                let mode = ThemeMode::from(if on { Brightness::Dark } else { Brightness::Light });
                settings.set_theme_mode(mode);
            }
            SettingsMsg::FollowSystem => settings.set_theme_mode(ThemeMode::System),
        }
    }

    /// Build the screen from current state and clear the dirty flag.
    #[must_use]
    pub fn view(&self) -> SettingsScreen {
        self.dirty.set(false);
        let ctx = &self.ctx;
        let current = ctx.locale();
        let catalog = ctx.catalog();

        let locale_options = self
            .options
            .iter()
            .map(|locale| LocaleOption {
                label: catalog
                    .get(locale.as_str(), keys::LANGUAGE_NAME)
                    .map_or_else(|| locale.to_string(), str::to_string),
                selected: *locale == current,
                locale: locale.clone(),
            })
            .collect();

        SettingsScreen {
            title: ctx.tr(keys::TITLE),
            direction: current.direction(),
            theme: ctx.theme().clone(),
            language_label: ctx.tr(keys::LANGUAGE),
            locale_options,
            dark_mode_label: ctx.tr(keys::DARK_MODE),
            dark_mode_on: ctx.brightness().is_dark(),
            follow_system_label: ctx.tr(keys::FOLLOW_SYSTEM),
            following_system: ctx.settings().theme_mode() == ThemeMode::System,
        }
    }
}
