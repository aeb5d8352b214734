#![forbid(unsafe_code)]

//! Host appearance: the OS-level light/dark preference as an observable.
//!
//! Nothing here detects the OS setting. The embedding host (or a test)
//! pushes changes with [`HostAppearance::set_brightness`]; anything holding a
//! clone sees the new value on its next read, and subscribers are told
//! immediately. The theme for `ThemeMode::System` is resolved against the
//! live value, never a copy taken at startup.

use hue_style::{Brightness, HostPreference};
use tracing::info;

use crate::reactive::{Observable, Subscription};

/// Shared, observable host brightness preference.
#[derive(Debug, Clone)]
pub struct HostAppearance {
    brightness: Observable<Brightness>,
}

impl HostAppearance {
    #[must_use]
    pub fn new(initial: Brightness) -> Self {
        Self {
            brightness: Observable::new(initial),
        }
    }

    #[must_use]
    pub fn brightness(&self) -> Brightness {
        self.brightness.get()
    }

    /// Report a new host preference. Repeating the current value is a no-op.
    pub fn set_brightness(&self, brightness: Brightness) {
        if self.brightness.get() != brightness {
            info!(brightness = brightness.as_str(), "host appearance changed");
        }
        self.brightness.set(brightness);
    }

    /// Called with the new brightness whenever the host preference changes.
    pub fn subscribe(&self, callback: impl Fn(Brightness) + 'static) -> Subscription {
        self.brightness.subscribe(move |b| callback(*b))
    }
}

impl Default for HostAppearance {
    fn default() -> Self {
        Self::new(Brightness::Light)
    }
}

impl HostPreference for HostAppearance {
    fn brightness(&self) -> Brightness {
        HostAppearance::brightness(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hue_style::{ThemeMode, ThemeSet};
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn clones_share_the_preference() {
        let host = HostAppearance::default();
        let view = host.clone();
        host.set_brightness(Brightness::Dark);
        assert_eq!(view.brightness(), Brightness::Dark);
    }

    #[test]
    fn subscribers_see_changes_only() {
        let host = HostAppearance::new(Brightness::Dark);
        let calls = Rc::new(Cell::new(0));
        let c = Rc::clone(&calls);
        let _sub = host.subscribe(move |b| {
            assert_eq!(b, Brightness::Light);
            c.set(c.get() + 1);
        });

        host.set_brightness(Brightness::Dark);
        host.set_brightness(Brightness::Light);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn system_mode_tracks_host_without_settings_change() {
        let host = HostAppearance::new(Brightness::Light);
        let themes = ThemeSet::default();

        assert_eq!(
            themes.resolve(ThemeMode::System, &host).brightness,
            Brightness::Light
        );
        host.set_brightness(Brightness::Dark);
        assert_eq!(
            themes.resolve(ThemeMode::System, &host).brightness,
            Brightness::Dark
        );
        assert_eq!(
            themes.resolve(ThemeMode::Light, &host).brightness,
            Brightness::Light
        );
    }
}
