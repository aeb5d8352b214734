#![forbid(unsafe_code)]

//! Named bundles of auxiliary colors attached to a [`Theme`](crate::Theme).
//!
//! The base theme only knows a handful of slots (primary, card, background,
//! text). Apps that need more, such as status colors for success, warning
//! and info banners, register a [`ThemeExtension`] under a name and look it
//! up at render time:
//!
//! ```
//! use hue_style::{Rgb, Theme, ThemeExtension};
//!
//! let status = ThemeExtension::new("status")
//!     .with_color("success", Rgb::new(0x2e, 0x7d, 0x32))
//!     .with_color("warning", Rgb::new(0xf9, 0xa8, 0x25));
//!
//! let theme = Theme::light().with_extension(status);
//! let success = theme.extension("status").and_then(|ext| ext.get("success"));
//! assert_eq!(success, Some(Rgb::new(0x2e, 0x7d, 0x32)));
//! ```
//!
//! Extensions support `copy_with` (override some colors, keep the rest) and
//! `lerp` so a light and a dark variant can be blended during a theme
//! transition.

use ahash::AHashMap;

use crate::color::Rgb;

/// A named set of colors keyed by slot name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeExtension {
    name: String,
    colors: AHashMap<String, Rgb>,
}

impl ThemeExtension {
    /// Create an empty extension.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            colors: AHashMap::new(),
        }
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with_color(mut self, slot: impl Into<String>, color: Rgb) -> Self {
        self.colors.insert(slot.into(), color);
        self
    }

    /// Insert or replace a slot.
    pub fn set(&mut self, slot: impl Into<String>, color: Rgb) {
        self.colors.insert(slot.into(), color);
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Color for `slot`, if defined.
    #[must_use]
    pub fn get(&self, slot: &str) -> Option<Rgb> {
        self.colors.get(slot).copied()
    }

    /// Slot names in sorted order.
    #[must_use]
    pub fn slots(&self) -> Vec<&str> {
        let mut slots: Vec<&str> = self.colors.keys().map(String::as_str).collect();
        slots.sort_unstable();
        slots
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Copy of this extension with `overrides` applied on top.
    ///
    /// Slots not named in `overrides` keep their current value.
    #[must_use]
    pub fn copy_with<I, S>(&self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (S, Rgb)>,
        S: Into<String>,
    {
        let mut next = self.clone();
        for (slot, color) in overrides {
            next.colors.insert(slot.into(), color);
        }
        next
    }

    /// Blend towards `other` by `t` in `[0, 1]`.
    ///
    /// Slots present on both sides are interpolated per channel. A slot
    /// present on only one side snaps: it is kept from `self` while
    /// `t < 0.5` and taken from `other` from `t >= 0.5` on. The result keeps
    /// `self`'s name.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let mut colors = AHashMap::with_capacity(self.colors.len().max(other.colors.len()));

        for (slot, &from) in &self.colors {
            match other.colors.get(slot) {
                Some(&to) => {
                    colors.insert(slot.clone(), from.lerp(to, t));
                }
                None if t < 0.5 => {
                    colors.insert(slot.clone(), from);
                }
                None => {}
            }
        }
        if t >= 0.5 {
            for (slot, &to) in &other.colors {
                colors.entry(slot.clone()).or_insert(to);
            }
        }

        Self {
            name: self.name.clone(),
            colors,
        }
    }

    /// Iterate over `(slot, color)` pairs in sorted slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Rgb)> + '_ {
        self.slots()
            .into_iter()
            .filter_map(move |slot| self.colors.get(slot).map(|&color| (slot, color)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREEN: Rgb = Rgb::new(0, 200, 0);
    const AMBER: Rgb = Rgb::new(250, 180, 0);
    const BLUE: Rgb = Rgb::new(0, 0, 200);

    fn status() -> ThemeExtension {
        ThemeExtension::new("status")
            .with_color("success", GREEN)
            .with_color("warning", AMBER)
    }

    #[test]
    fn get_and_slots() {
        let ext = status();
        assert_eq!(ext.name(), "status");
        assert_eq!(ext.get("success"), Some(GREEN));
        assert_eq!(ext.get("info"), None);
        assert_eq!(ext.slots(), vec!["success", "warning"]);
        assert_eq!(ext.len(), 2);
        assert!(!ext.is_empty());
    }

    #[test]
    fn copy_with_overrides_only_named_slots() {
        let ext = status();
        let next = ext.copy_with([("warning", BLUE), ("info", BLUE)]);
        assert_eq!(next.get("success"), Some(GREEN));
        assert_eq!(next.get("warning"), Some(BLUE));
        assert_eq!(next.get("info"), Some(BLUE));
        // Original untouched.
        assert_eq!(ext.get("warning"), Some(AMBER));
    }

    #[test]
    fn lerp_interpolates_shared_slots() {
        let from = ThemeExtension::new("status").with_color("success", Rgb::new(0, 0, 0));
        let to = ThemeExtension::new("status").with_color("success", Rgb::new(100, 200, 50));
        assert_eq!(from.lerp(&to, 0.5).get("success"), Some(Rgb::new(50, 100, 25)));
        assert_eq!(from.lerp(&to, 0.0), from);
        assert_eq!(from.lerp(&to, 1.0).get("success"), Some(Rgb::new(100, 200, 50)));
    }

    #[test]
    fn lerp_snaps_one_sided_slots_at_half() {
        let from = ThemeExtension::new("status").with_color("only_from", GREEN);
        let to = ThemeExtension::new("status").with_color("only_to", BLUE);

        let early = from.lerp(&to, 0.25);
        assert_eq!(early.get("only_from"), Some(GREEN));
        assert_eq!(early.get("only_to"), None);

        let late = from.lerp(&to, 0.5);
        assert_eq!(late.get("only_from"), None);
        assert_eq!(late.get("only_to"), Some(BLUE));
    }

    #[test]
    fn iter_is_sorted() {
        let ext = ThemeExtension::new("x")
            .with_color("b", BLUE)
            .with_color("a", GREEN);
        let pairs: Vec<_> = ext.iter().collect();
        assert_eq!(pairs, vec![("a", GREEN), ("b", BLUE)]);
    }
}
