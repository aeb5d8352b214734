//! Property-based invariant tests for colors and theme resolution.
//!
//! 1. Hex formatting parses back to the same color
//! 2. Contrast ratio is symmetric and within [1, 21]
//! 3. Lerp stays within the channel bounds of its endpoints
//! 4. Explicit modes never consult the host
//! 5. System mode always matches the host

use hue_style::{Brightness, Rgb, ThemeMode, ThemeSet, contrast_ratio};
use proptest::prelude::*;

fn any_rgb() -> impl Strategy<Value = Rgb> {
    (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| Rgb::new(r, g, b))
}

fn any_brightness() -> impl Strategy<Value = Brightness> {
    prop_oneof![Just(Brightness::Light), Just(Brightness::Dark)]
}

proptest! {
    #[test]
    fn hex_formatting_parses_back(color in any_rgb()) {
        prop_assert_eq!(Rgb::from_hex(&color.to_hex()), Ok(color));
    }

    #[test]
    fn contrast_is_symmetric_and_bounded(a in any_rgb(), b in any_rgb()) {
        let ab = contrast_ratio(a, b);
        let ba = contrast_ratio(b, a);
        prop_assert!((ab - ba).abs() < 1e-12);
        prop_assert!((1.0..=21.0 + 1e-9).contains(&ab), "ratio {} out of range", ab);
    }

    #[test]
    fn lerp_stays_between_endpoints(a in any_rgb(), b in any_rgb(), t in 0.0f32..=1.0) {
        let mixed = a.lerp(b, t);
        for (m, x, y) in [(mixed.r, a.r, b.r), (mixed.g, a.g, b.g), (mixed.b, a.b, b.b)] {
            prop_assert!(m >= x.min(y) && m <= x.max(y));
        }
    }

    #[test]
    fn explicit_modes_ignore_host(host in any_brightness()) {
        let set = ThemeSet::default();
        prop_assert_eq!(set.resolve(ThemeMode::Light, &host).brightness, Brightness::Light);
        prop_assert_eq!(set.resolve(ThemeMode::Dark, &host).brightness, Brightness::Dark);
    }

    #[test]
    fn system_mode_follows_host(host in any_brightness()) {
        let set = ThemeSet::default();
        prop_assert_eq!(set.resolve(ThemeMode::System, &host).brightness, host);
    }
}
