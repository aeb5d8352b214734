#![forbid(unsafe_code)]

//! Theme descriptors, theme modes, and mode resolution.
//!
//! # Resolution
//!
//! A [`ThemeSet`] always holds exactly two descriptors, one light and one
//! dark. [`ThemeSet::resolve`] maps a [`ThemeMode`] to one of them:
//!
//! | Mode     | Result                                         |
//! |----------|------------------------------------------------|
//! | `Light`  | light descriptor                               |
//! | `Dark`   | dark descriptor                                |
//! | `System` | whatever the [`HostPreference`] reports *now*  |
//!
//! `System` is never collapsed into a stored light/dark value: the host is
//! queried on every call, so a change of the OS setting shows up on the next
//! render without touching the settings.

use std::fmt;
use std::str::FromStr;

use ahash::AHashMap;
use tracing::trace;

use crate::color::{ColorParseError, Rgb};
use crate::extension::ThemeExtension;

/// Light or dark. The resolved counterpart of [`ThemeMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Brightness {
    #[default]
    Light,
    Dark,
}

impl Brightness {
    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// User-selected theme mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ThemeMode {
    Light,
    Dark,
    /// Follow the host preference.
    #[default]
    System,
}

impl ThemeMode {
    pub const ALL: [ThemeMode; 3] = [ThemeMode::Light, ThemeMode::Dark, ThemeMode::System];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    /// The brightness this mode stands for, consulting `host` for `System`.
    #[must_use]
    pub fn brightness(self, host: &dyn HostPreference) -> Brightness {
        match self {
            Self::Light => Brightness::Light,
            Self::Dark => Brightness::Dark,
            Self::System => host.brightness(),
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            _ => Err(ThemeError::UnknownMode(s.to_string())),
        }
    }
}

impl From<Brightness> for ThemeMode {
    fn from(brightness: Brightness) -> Self {
        match brightness {
            Brightness::Light => Self::Light,
            Brightness::Dark => Self::Dark,
        }
    }
}

/// Source of the host-level light/dark preference.
///
/// The embedder supplies this; nothing in this crate computes it.
pub trait HostPreference {
    fn brightness(&self) -> Brightness;
}

/// A fixed brightness acts as a host that never changes its mind.
impl HostPreference for Brightness {
    fn brightness(&self) -> Brightness {
        *self
    }
}

impl<F> HostPreference for F
where
    F: Fn() -> Brightness,
{
    fn brightness(&self) -> Brightness {
        self()
    }
}

/// Color and style values for one brightness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub brightness: Brightness,
    pub primary: Rgb,
    pub card: Rgb,
    pub background: Rgb,
    pub text: Rgb,
    extensions: AHashMap<String, ThemeExtension>,
}

impl Theme {
    /// Default light descriptor.
    #[must_use]
    pub fn light() -> Self {
        Self {
            brightness: Brightness::Light,
            primary: Rgb::new(0x21, 0x96, 0xf3),
            card: Rgb::WHITE,
            background: Rgb::new(0xfa, 0xfa, 0xfa),
            text: Rgb::new(0x21, 0x21, 0x21),
            extensions: AHashMap::new(),
        }
    }

    /// Default dark descriptor.
    #[must_use]
    pub fn dark() -> Self {
        Self {
            brightness: Brightness::Dark,
            primary: Rgb::new(0x90, 0xca, 0xf9),
            card: Rgb::new(0x1e, 0x1e, 0x1e),
            background: Rgb::new(0x12, 0x12, 0x12),
            text: Rgb::new(0xe0, 0xe0, 0xe0),
            extensions: AHashMap::new(),
        }
    }

    /// Default descriptor for a brightness.
    #[must_use]
    pub fn for_brightness(brightness: Brightness) -> Self {
        match brightness {
            Brightness::Light => Self::light(),
            Brightness::Dark => Self::dark(),
        }
    }

    /// Builder seeded from the light preset.
    #[must_use]
    pub fn builder() -> ThemeBuilder {
        ThemeBuilder::new()
    }

    /// Attach (or replace) an extension under its name.
    #[must_use]
    pub fn with_extension(mut self, extension: ThemeExtension) -> Self {
        self.extensions
            .insert(extension.name().to_string(), extension);
        self
    }

    /// Extension registered under `name`.
    #[must_use]
    pub fn extension(&self, name: &str) -> Option<&ThemeExtension> {
        self.extensions.get(name)
    }

    /// Registered extension names in sorted order.
    #[must_use]
    pub fn extension_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.extensions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Look up `extension.slot`, e.g. `status.success`.
    #[must_use]
    pub fn extension_color(&self, path: &str) -> Option<Rgb> {
        let (name, slot) = path.split_once('.')?;
        self.extension(name)?.get(slot)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

/// Builder for [`Theme`].
#[derive(Debug, Clone)]
pub struct ThemeBuilder {
    theme: Theme,
}

impl ThemeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            theme: Theme::light(),
        }
    }

    /// Start from an existing theme.
    #[must_use]
    pub fn from_theme(theme: Theme) -> Self {
        Self { theme }
    }

    #[must_use]
    pub fn brightness(mut self, brightness: Brightness) -> Self {
        self.theme.brightness = brightness;
        self
    }

    #[must_use]
    pub fn primary(mut self, color: Rgb) -> Self {
        self.theme.primary = color;
        self
    }

    #[must_use]
    pub fn card(mut self, color: Rgb) -> Self {
        self.theme.card = color;
        self
    }

    #[must_use]
    pub fn background(mut self, color: Rgb) -> Self {
        self.theme.background = color;
        self
    }

    #[must_use]
    pub fn text(mut self, color: Rgb) -> Self {
        self.theme.text = color;
        self
    }

    #[must_use]
    pub fn extension(mut self, extension: ThemeExtension) -> Self {
        self.theme = self.theme.with_extension(extension);
        self
    }

    #[must_use]
    pub fn build(self) -> Theme {
        self.theme
    }
}

impl Default for ThemeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The light and dark descriptors an app renders with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeSet {
    light: Theme,
    dark: Theme,
}

impl ThemeSet {
    /// Pair two descriptors. Their `brightness` fields are normalised to
    /// match the slot they occupy.
    #[must_use]
    pub fn new(mut light: Theme, mut dark: Theme) -> Self {
        light.brightness = Brightness::Light;
        dark.brightness = Brightness::Dark;
        Self { light, dark }
    }

    #[must_use]
    pub fn light(&self) -> &Theme {
        &self.light
    }

    #[must_use]
    pub fn dark(&self) -> &Theme {
        &self.dark
    }

    #[must_use]
    pub fn for_brightness(&self, brightness: Brightness) -> &Theme {
        match brightness {
            Brightness::Light => &self.light,
            Brightness::Dark => &self.dark,
        }
    }

    /// Descriptor to render for `mode`.
    #[must_use]
    pub fn resolve(&self, mode: ThemeMode, host: &dyn HostPreference) -> &Theme {
        let brightness = mode.brightness(host);
        trace!(mode = mode.as_str(), resolved = brightness.as_str(), "theme resolved");
        self.for_brightness(brightness)
    }
}

impl Default for ThemeSet {
    fn default() -> Self {
        Self::new(Theme::light(), Theme::dark())
    }
}

/// Errors from parsing theme values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeError {
    /// Mode string is not `light`, `dark`, or `system`.
    UnknownMode(String),
    /// A color value failed to parse.
    InvalidColor(ColorParseError),
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownMode(mode) => {
                write!(f, "unknown theme mode {mode:?} (expected light, dark, or system)")
            }
            Self::InvalidColor(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ThemeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidColor(err) => Some(err),
            Self::UnknownMode(_) => None,
        }
    }
}

impl From<ColorParseError> for ThemeError {
    fn from(err: ColorParseError) -> Self {
        Self::InvalidColor(err)
    }
}

#[cfg(feature = "serde")]
mod document {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Serialize};

    use super::{Brightness, Theme, ThemeExtension};
    use crate::color::Rgb;

    /// Serializable form of a [`Theme`].
    ///
    /// ```json
    /// {
    ///   "brightness": "dark",
    ///   "primary": "#90caf9",
    ///   "card": "#1e1e1e",
    ///   "background": "#121212",
    ///   "text": "#e0e0e0",
    ///   "extensions": { "status": { "success": "#66bb6a" } }
    /// }
    /// ```
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub struct ThemeDocument {
        pub brightness: Brightness,
        pub primary: Rgb,
        pub card: Rgb,
        pub background: Rgb,
        pub text: Rgb,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        pub extensions: BTreeMap<String, BTreeMap<String, Rgb>>,
    }

    impl From<ThemeDocument> for Theme {
        fn from(doc: ThemeDocument) -> Self {
            let mut theme = Theme::builder()
                .brightness(doc.brightness)
                .primary(doc.primary)
                .card(doc.card)
                .background(doc.background)
                .text(doc.text)
                .build();
            for (name, colors) in doc.extensions {
                let mut ext = ThemeExtension::new(name);
                for (slot, color) in colors {
                    ext.set(slot, color);
                }
                theme = theme.with_extension(ext);
            }
            theme
        }
    }

    impl From<&Theme> for ThemeDocument {
        fn from(theme: &Theme) -> Self {
            let extensions = theme
                .extensions
                .values()
                .map(|ext| {
                    let colors = ext
                        .iter()
                        .map(|(slot, color)| (slot.to_string(), color))
                        .collect();
                    (ext.name().to_string(), colors)
                })
                .collect();
            Self {
                brightness: theme.brightness,
                primary: theme.primary,
                card: theme.card,
                background: theme.background,
                text: theme.text,
                extensions,
            }
        }
    }
}

#[cfg(feature = "serde")]
pub use document::ThemeDocument;

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn explicit_modes_ignore_host() {
        let set = ThemeSet::default();
        assert_eq!(set.resolve(ThemeMode::Light, &Brightness::Dark), set.light());
        assert_eq!(set.resolve(ThemeMode::Dark, &Brightness::Light), set.dark());
    }

    #[test]
    fn system_mode_queries_host_every_time() {
        let set = ThemeSet::default();
        let host_dark = Cell::new(false);
        let host = || {
            if host_dark.get() {
                Brightness::Dark
            } else {
                Brightness::Light
            }
        };

        assert_eq!(set.resolve(ThemeMode::System, &host).brightness, Brightness::Light);
        host_dark.set(true);
        assert_eq!(set.resolve(ThemeMode::System, &host).brightness, Brightness::Dark);
    }

    #[test]
    #[tracing_test::traced_test]
    fn resolve_emits_trace_event() {
        let set = ThemeSet::default();
        let _ = set.resolve(ThemeMode::Dark, &Brightness::Light);
        assert!(logs_contain("theme resolved"));
    }

    #[test]
    fn mode_parse_and_display() {
        for mode in ThemeMode::ALL {
            assert_eq!(mode.to_string().parse::<ThemeMode>(), Ok(mode));
        }
        assert_eq!(" DARK ".parse::<ThemeMode>(), Ok(ThemeMode::Dark));
        assert_eq!(
            "sepia".parse::<ThemeMode>(),
            Err(ThemeError::UnknownMode("sepia".into()))
        );
        assert_eq!(ThemeMode::default(), ThemeMode::System);
    }

    #[test]
    fn theme_set_normalises_brightness() {
        let set = ThemeSet::new(Theme::dark(), Theme::light());
        assert_eq!(set.light().brightness, Brightness::Light);
        assert_eq!(set.dark().brightness, Brightness::Dark);
    }

    #[test]
    fn extension_color_path_lookup() {
        let theme = Theme::light().with_extension(
            ThemeExtension::new("status").with_color("info", Rgb::new(1, 2, 3)),
        );
        assert_eq!(theme.extension_color("status.info"), Some(Rgb::new(1, 2, 3)));
        assert_eq!(theme.extension_color("status.missing"), None);
        assert_eq!(theme.extension_color("status"), None);
        assert_eq!(theme.extension_names(), vec!["status"]);
    }

    #[test]
    fn error_display_and_source() {
        use std::error::Error as _;
        let err = ThemeError::from(Rgb::from_hex("nope").unwrap_err());
        assert!(err.to_string().contains("nope"));
        assert!(err.source().is_some());
        assert!(ThemeError::UnknownMode("x".into()).source().is_none());
    }
}
