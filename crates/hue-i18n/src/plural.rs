#![forbid(unsafe_code)]

//! ICU-style plural categories and per-language selection rules.
//!
//! Only the integer rules are modelled. A catalog entry stores up to six
//! forms ([`PluralForms`]); the locale's [`PluralRule`] maps a count to a
//! [`PluralCategory`] and the entry picks the matching form, falling back to
//! `other` when the category has no dedicated text.

/// CLDR plural category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    pub const ALL: [PluralCategory; 6] = [
        PluralCategory::Zero,
        PluralCategory::One,
        PluralCategory::Two,
        PluralCategory::Few,
        PluralCategory::Many,
        PluralCategory::Other,
    ];

    /// Lowercase CLDR keyword (`"one"`, `"few"`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::One => "one",
            Self::Two => "two",
            Self::Few => "few",
            Self::Many => "many",
            Self::Other => "other",
        }
    }

    /// Parse a CLDR keyword.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cat| cat.as_str() == keyword)
    }
}

/// The text variants of a pluralized entry.
///
/// `one` and `other` are mandatory; the remaining categories fall back to
/// `other` when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluralForms {
    pub zero: Option<String>,
    pub one: String,
    pub two: Option<String>,
    pub few: Option<String>,
    pub many: Option<String>,
    pub other: String,
}

impl PluralForms {
    /// Two-form entry (singular, plural).
    #[must_use]
    pub fn new(one: impl Into<String>, other: impl Into<String>) -> Self {
        Self {
            one: one.into(),
            other: other.into(),
            ..Default::default()
        }
    }

    /// Builder-style setter for the `zero` form.
    #[must_use]
    pub fn with_zero(mut self, zero: impl Into<String>) -> Self {
        self.zero = Some(zero.into());
        self
    }

    /// Text for `category`, falling back to `other`.
    #[must_use]
    pub fn select(&self, category: PluralCategory) -> &str {
        let explicit = match category {
            PluralCategory::One => return &self.one,
            PluralCategory::Other => return &self.other,
            PluralCategory::Zero => self.zero.as_deref(),
            PluralCategory::Two => self.two.as_deref(),
            PluralCategory::Few => self.few.as_deref(),
            PluralCategory::Many => self.many.as_deref(),
        };
        explicit.unwrap_or(&self.other)
    }

    /// Set the text for a category.
    pub fn set(&mut self, category: PluralCategory, text: impl Into<String>) {
        let text = text.into();
        match category {
            PluralCategory::Zero => self.zero = Some(text),
            PluralCategory::One => self.one = text,
            PluralCategory::Two => self.two = Some(text),
            PluralCategory::Few => self.few = Some(text),
            PluralCategory::Many => self.many = Some(text),
            PluralCategory::Other => self.other = text,
        }
    }

    /// Every non-empty form, in category order.
    pub fn forms(&self) -> impl Iterator<Item = &str> + '_ {
        PluralCategory::ALL.into_iter().filter_map(move |cat| {
            let text = match cat {
                PluralCategory::One => Some(self.one.as_str()),
                PluralCategory::Other => Some(self.other.as_str()),
                PluralCategory::Zero => self.zero.as_deref(),
                PluralCategory::Two => self.two.as_deref(),
                PluralCategory::Few => self.few.as_deref(),
                PluralCategory::Many => self.many.as_deref(),
            };
            text.filter(|t| !t.is_empty())
        })
    }
}

/// Maps a count to a [`PluralCategory`].
///
/// Built-in rules treat negative counts by absolute value.
#[derive(Debug, Clone, Copy)]
pub enum PluralRule {
    /// one: |n| = 1. Also used for German, Dutch, Spanish, Italian, ...
    English,
    /// one: |n| <= 1. Also Brazilian Portuguese.
    French,
    /// East Slavic: one / few / many.
    Russian,
    /// one only for exactly 1, then few / many.
    Polish,
    /// zero / one / two / few / many / other.
    Arabic,
    /// No plural distinction.
    CJK,
    /// Caller-provided rule.
    Custom(fn(i64) -> PluralCategory),
}

impl PluralRule {
    /// Categorize `count`.
    #[must_use]
    pub fn categorize(&self, count: i64) -> PluralCategory {
        let n = count.unsigned_abs();
        match self {
            Self::English => {
                if n == 1 {
                    PluralCategory::One
                } else {
                    PluralCategory::Other
                }
            }
            Self::French => {
                if n <= 1 {
                    PluralCategory::One
                } else {
                    PluralCategory::Other
                }
            }
            Self::Russian => {
                let (m10, m100) = (n % 10, n % 100);
                if m10 == 1 && m100 != 11 {
                    PluralCategory::One
                } else if (2..=4).contains(&m10) && !(12..=14).contains(&m100) {
                    PluralCategory::Few
                } else {
                    PluralCategory::Many
                }
            }
            Self::Polish => {
                let (m10, m100) = (n % 10, n % 100);
                if n == 1 {
                    PluralCategory::One
                } else if (2..=4).contains(&m10) && !(12..=14).contains(&m100) {
                    PluralCategory::Few
                } else {
                    PluralCategory::Many
                }
            }
            Self::Arabic => {
                let m100 = n % 100;
                match n {
                    0 => PluralCategory::Zero,
                    1 => PluralCategory::One,
                    2 => PluralCategory::Two,
                    _ if (3..=10).contains(&m100) => PluralCategory::Few,
                    _ if (11..=99).contains(&m100) => PluralCategory::Many,
                    _ => PluralCategory::Other,
                }
            }
            Self::CJK => PluralCategory::Other,
            Self::Custom(rule) => rule(count),
        }
    }

    /// Built-in rule for a locale tag; unknown languages use [`Self::English`].
    #[must_use]
    pub fn for_locale(locale: &str) -> Self {
        let language = locale
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let normalized = locale.replace('_', "-").to_ascii_lowercase();
        match language.as_str() {
            "fr" => Self::French,
            "pt" if normalized == "pt-br" => Self::French,
            "ru" | "uk" | "be" => Self::Russian,
            "pl" => Self::Polish,
            "ar" => Self::Arabic,
            "zh" | "ja" | "ko" | "vi" | "th" | "id" | "ms" => Self::CJK,
            _ => Self::English,
        }
    }
}

impl Default for PluralRule {
    fn default() -> Self {
        Self::English
    }
}
