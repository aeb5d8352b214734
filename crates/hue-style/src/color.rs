#![forbid(unsafe_code)]

//! Color values, hex parsing, and WCAG contrast utilities.
//!
//! Theme descriptors store every slot as an [`Rgb`]. Colors are written in
//! configuration and theme files as hex strings (`#1e88e5`), so parsing and
//! formatting live next to the type.

use std::fmt;
use std::str::FromStr;

/// WCAG AA minimum contrast ratio for normal text.
pub const WCAG_AA_NORMAL_TEXT: f64 = 4.5;
/// WCAG AA minimum contrast ratio for large text.
pub const WCAG_AA_LARGE_TEXT: f64 = 3.0;

/// An opaque 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex color.
    ///
    /// Accepts `#rgb`, `#rrggbb`, and `#aarrggbb` (the alpha byte is
    /// discarded). The leading `#` is optional.
    pub fn from_hex(text: &str) -> Result<Self, ColorParseError> {
        let trimmed = text.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::new(text));
        }

        let byte = |s: &str| u8::from_str_radix(s, 16).map_err(|_| ColorParseError::new(text));
        match digits.len() {
            3 => {
                let mut channels = [0u8; 3];
                for (slot, ch) in channels.iter_mut().zip(digits.chars()) {
                    let nibble = ch.to_digit(16).ok_or_else(|| ColorParseError::new(text))? as u8;
                    *slot = nibble * 17;
                }
                Ok(Self::new(channels[0], channels[1], channels[2]))
            }
            6 => Ok(Self::new(
                byte(&digits[0..2])?,
                byte(&digits[2..4])?,
                byte(&digits[4..6])?,
            )),
            8 => Ok(Self::new(
                byte(&digits[2..4])?,
                byte(&digits[4..6])?,
                byte(&digits[6..8])?,
            )),
            _ => Err(ColorParseError::new(text)),
        }
    }

    /// Lowercase `#rrggbb` form.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Linear interpolation between two colors. `t` is clamped to `[0, 1]`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let mix = |a: u8, b: u8| -> u8 {
            let value = f32::from(a) + (f32::from(b) - f32::from(a)) * t;
            value.round().clamp(0.0, 255.0) as u8
        };
        Self::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }

    /// WCAG 2.1 relative luminance in `[0, 1]`.
    #[must_use]
    pub fn relative_luminance(self) -> f64 {
        fn linear(channel: u8) -> f64 {
            let c = f64::from(channel) / 255.0;
            if c <= 0.039_28 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * linear(self.r) + 0.7152 * linear(self.g) + 0.0722 * linear(self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

/// WCAG contrast ratio between two colors, in `[1, 21]`.
#[must_use]
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let la = a.relative_luminance();
    let lb = b.relative_luminance();
    let (hi, lo) = if la >= lb { (la, lb) } else { (lb, la) };
    (hi + 0.05) / (lo + 0.05)
}

/// Whether `fg` on `bg` meets WCAG AA for normal text.
#[must_use]
pub fn meets_wcag_aa(fg: Rgb, bg: Rgb) -> bool {
    contrast_ratio(fg, bg) >= WCAG_AA_NORMAL_TEXT
}

/// Pick the candidate with the highest contrast against `bg`.
///
/// Returns `None` only when `candidates` is empty.
#[must_use]
pub fn best_text_color(bg: Rgb, candidates: &[Rgb]) -> Option<Rgb> {
    candidates.iter().copied().max_by(|a, b| {
        contrast_ratio(*a, bg)
            .partial_cmp(&contrast_ratio(*b, bg))
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

/// A hex string that is not a valid color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError {
    input: String,
}

impl ColorParseError {
    fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
        }
    }

    /// The rejected input.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid hex color: {:?}", self.input)
    }
}

impl std::error::Error for ColorParseError {}

#[cfg(feature = "serde")]
impl serde::Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Rgb {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <String as serde::Deserialize>::deserialize(deserializer)?;
        Rgb::from_hex(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_six_digit_hex() {
        assert_eq!(Rgb::from_hex("#1e88e5"), Ok(Rgb::new(0x1e, 0x88, 0xe5)));
        assert_eq!(Rgb::from_hex("1E88E5"), Ok(Rgb::new(0x1e, 0x88, 0xe5)));
    }

    #[test]
    fn parses_short_hex() {
        assert_eq!(Rgb::from_hex("#fff"), Ok(Rgb::WHITE));
        assert_eq!(Rgb::from_hex("#0a0"), Ok(Rgb::new(0, 0xaa, 0)));
    }

    #[test]
    fn alpha_prefix_is_dropped() {
        assert_eq!(Rgb::from_hex("#ff2196f3"), Ok(Rgb::new(0x21, 0x96, 0xf3)));
    }

    #[test]
    fn rejects_bad_hex() {
        for bad in ["", "#", "#12", "#12345", "#gggggg", "#1234567", "# ff00ff"] {
            assert!(Rgb::from_hex(bad).is_err(), "{bad:?} should be rejected");
        }
        let err = Rgb::from_hex("#zz0000").unwrap_err();
        assert_eq!(err.input(), "#zz0000");
        assert!(err.to_string().contains("#zz0000"));
    }

    #[test]
    fn hex_display_is_lowercase() {
        assert_eq!(Rgb::new(0xAB, 0xCD, 0xEF).to_string(), "#abcdef");
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = Rgb::new(0, 0, 0);
        let b = Rgb::new(200, 100, 50);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgb::new(100, 50, 25));
        assert_eq!(a.lerp(b, 7.0), b);
        assert_eq!(a.lerp(b, -1.0), a);
    }

    #[test]
    fn contrast_black_white_is_21() {
        let ratio = contrast_ratio(Rgb::BLACK, Rgb::WHITE);
        assert!((ratio - 21.0).abs() < 1e-9);
        assert!((contrast_ratio(Rgb::WHITE, Rgb::WHITE) - 1.0).abs() < 1e-9);
        assert!(meets_wcag_aa(Rgb::BLACK, Rgb::WHITE));
    }

    #[test]
    fn best_text_color_prefers_contrast() {
        let dark_bg = Rgb::new(18, 18, 18);
        assert_eq!(
            best_text_color(dark_bg, &[Rgb::BLACK, Rgb::WHITE]),
            Some(Rgb::WHITE)
        );
        assert_eq!(best_text_color(dark_bg, &[]), None);
    }
}
