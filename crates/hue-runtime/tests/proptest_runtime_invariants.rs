//! Property-based invariant tests for locales, observables, batching, and
//! the settings holder.
//!
//! 1. `Locale::parse` accepts its own output unchanged
//! 2. `Observable::publish` bumps the version and notifies once per call
//! 3. Inside a batch, any number of writes reaches each observer once
//! 4. `set_locale` always lands on a supported locale
//! 5. Settings revision counts setter calls, whatever the values

use std::cell::Cell;
use std::rc::Rc;

use hue_runtime::{BatchScope, Locale, Observable, SettingsController};
use hue_style::ThemeMode;
use proptest::prelude::*;

// ── Helpers ──────────────────────────────────────────────────────────

fn any_mode() -> impl Strategy<Value = ThemeMode> {
    prop::sample::select(ThemeMode::ALL.to_vec())
}

fn tag_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z]{2,3}([-_][a-zA-Z0-9]{2,4}){0,2}"
}

fn restricted(supported: &[&str], fallback: &str) -> SettingsController {
    let supported: Vec<Locale> = supported
        .iter()
        .map(|t| Locale::parse(t).unwrap())
        .collect();
    let fallback = Locale::parse(fallback).unwrap();
    SettingsController::new(ThemeMode::System, fallback.clone())
        .with_supported_locales(supported, fallback)
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Canonical tags parse back to themselves
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn parse_is_stable_on_canonical_tags(tag in tag_strategy()) {
        if let Ok(locale) = Locale::parse(&tag) {
            let again = Locale::parse(locale.as_str()).unwrap();
            prop_assert_eq!(again.as_str(), locale.as_str());
            prop_assert_eq!(again.language(), locale.language());
        }
    }

    #[test]
    fn parse_never_panics(tag in ".*") {
        let _ = Locale::parse(&tag);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. publish: one version bump and one notification per call
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn publish_counts_every_call(modes in prop::collection::vec(any_mode(), 0..30)) {
        let mode = Observable::new(ThemeMode::System);
        let hits = Rc::new(Cell::new(0u64));
        let sink = Rc::clone(&hits);
        let _sub = mode.subscribe(move |_| sink.set(sink.get() + 1));

        for m in &modes {
            mode.publish(*m);
        }
        prop_assert_eq!(mode.version(), modes.len() as u64);
        prop_assert_eq!(hits.get(), modes.len() as u64);
        if let Some(last) = modes.last() {
            prop_assert_eq!(mode.get(), *last);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Batched writes reach each observer once, with the final value
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn batch_delivers_final_value_once(modes in prop::collection::vec(any_mode(), 1..30)) {
        let mode = Observable::new(ThemeMode::System);
        let seen = Rc::new(Cell::new((0u32, ThemeMode::System)));
        let sink = Rc::clone(&seen);
        let _sub = mode.subscribe(move |m| sink.set((sink.get().0 + 1, *m)));

        {
            let _batch = BatchScope::new();
            for m in &modes {
                mode.publish(*m);
            }
            prop_assert_eq!(seen.get().0, 0);
        }
        let last = *modes.last().unwrap();
        prop_assert_eq!(seen.get(), (1, last));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. set_locale lands on a supported locale
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn set_locale_stays_supported(tag in tag_strategy()) {
        let settings = restricted(&["en", "ar", "pt-BR"], "en");
        if let Ok(requested) = Locale::parse(&tag) {
            let applied = settings.set_locale(requested.clone());
            prop_assert!(settings.supported_locales().contains(&applied));
            prop_assert_eq!(settings.locale(), applied.clone());
            if settings.supported_locales().contains(&requested) {
                prop_assert_eq!(applied, requested);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Revision counts setter calls
// ═════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
enum Setter {
    Mode(ThemeMode),
    Locale(&'static str),
}

fn setter_strategy() -> impl Strategy<Value = Setter> {
    prop_oneof![
        any_mode().prop_map(Setter::Mode),
        prop::sample::select(vec!["en", "ar", "fr"]).prop_map(Setter::Locale),
    ]
}

proptest! {
    #[test]
    fn revision_counts_setter_calls(ops in prop::collection::vec(setter_strategy(), 0..20)) {
        let settings = restricted(&["en", "ar"], "en");
        for op in &ops {
            match op {
                Setter::Mode(mode) => settings.set_theme_mode(*mode),
                Setter::Locale(tag) => {
                    settings.set_locale(Locale::parse(tag).unwrap());
                }
            }
        }
        prop_assert_eq!(settings.revision(), ops.len() as u64);
    }
}
