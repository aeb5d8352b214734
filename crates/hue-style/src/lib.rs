#![forbid(unsafe_code)]

//! Colors and theme descriptors for Hue.
//!
//! # Role in Hue
//! `hue-style` is the shared vocabulary for colors and themes. The settings
//! layer stores a [`ThemeMode`]; this crate turns that mode into the
//! [`Theme`] to render, consulting a [`HostPreference`] when the mode is
//! `System`.
//!
//! # This crate provides
//! - [`Rgb`] with hex parsing and WCAG contrast helpers.
//! - [`Theme`] and [`ThemeBuilder`] for the base color slots.
//! - [`ThemeExtension`] for named auxiliary color groups.
//! - [`ThemeSet`] for light/dark pairs and mode resolution.

/// Color values and contrast utilities.
pub mod color;
/// Named auxiliary color groups.
pub mod extension;
/// Theme descriptors and mode resolution.
pub mod theme;

pub use color::{
    ColorParseError, Rgb, WCAG_AA_LARGE_TEXT, WCAG_AA_NORMAL_TEXT, best_text_color,
    contrast_ratio, meets_wcag_aa,
};
pub use extension::ThemeExtension;
#[cfg(feature = "serde")]
pub use theme::ThemeDocument;
pub use theme::{Brightness, HostPreference, Theme, ThemeBuilder, ThemeError, ThemeMode, ThemeSet};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_builder_from_theme_preserves_base_fields() {
        let base = Theme::builder()
            .primary(Rgb::new(10, 20, 30))
            .text(Rgb::new(40, 50, 60))
            .build();

        let updated = ThemeBuilder::from_theme(base.clone())
            .text(Rgb::new(70, 80, 90))
            .build();

        assert_eq!(updated.primary, base.primary);
        assert_eq!(updated.background, base.background);
        assert_eq!(updated.text, Rgb::new(70, 80, 90));
    }

    #[test]
    fn preset_text_is_readable_on_background() {
        for theme in [Theme::light(), Theme::dark()] {
            assert!(
                meets_wcag_aa(theme.text, theme.background),
                "{:?} preset text should meet AA",
                theme.brightness
            );
        }
    }

    #[test]
    fn builder_extension_is_attached() {
        let theme = Theme::builder()
            .brightness(Brightness::Dark)
            .extension(ThemeExtension::new("status").with_color("warning", Rgb::new(9, 9, 9)))
            .build();
        assert_eq!(theme.brightness, Brightness::Dark);
        assert_eq!(theme.extension_color("status.warning"), Some(Rgb::new(9, 9, 9)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn theme_document_json_round_trip() {
        let json = r##"{
            "brightness": "dark",
            "primary": "#90caf9",
            "card": "#1e1e1e",
            "background": "#121212",
            "text": "#e0e0e0",
            "extensions": { "status": { "success": "#66bb6a" } }
        }"##;
        let doc: ThemeDocument = serde_json::from_str(json).expect("valid theme json");
        let theme = Theme::from(doc.clone());
        assert_eq!(theme, Theme::dark().with_extension(
            ThemeExtension::new("status").with_color("success", Rgb::new(0x66, 0xbb, 0x6a))
        ));
        assert_eq!(ThemeDocument::from(&theme), doc);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn theme_document_rejects_bad_color() {
        let json = r##"{"brightness":"light","primary":"#xyz","card":"#fff","background":"#fff","text":"#000"}"##;
        assert!(serde_json::from_str::<ThemeDocument>(json).is_err());
    }
}
