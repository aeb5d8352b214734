#![forbid(unsafe_code)]

//! Errors raised while loading translation files.
//!
//! Lookups never fail; every variant here comes from startup loading, and
//! each one names the file and locale involved so a broken translation is
//! easy to locate.

use std::fmt;
use std::path::PathBuf;

/// Translation loading error.
#[derive(Debug)]
pub enum I18nError {
    /// Reading a file or directory failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The file is not valid JSON.
    Parse {
        path: Option<PathBuf>,
        locale: String,
        source: serde_json::Error,
    },
    /// The document root is not a JSON object.
    NotAnObject {
        path: Option<PathBuf>,
        locale: String,
    },
    /// A leaf value cannot be turned into a catalog entry.
    InvalidEntry {
        path: Option<PathBuf>,
        locale: String,
        key: String,
        reason: String,
    },
    /// A directory contained no `*.json` translation files.
    NoTranslations { path: PathBuf },
}

impl I18nError {
    /// Attach a file path to an error produced from an in-memory document.
    #[must_use]
    pub fn with_path(self, file: impl Into<PathBuf>) -> Self {
        let file = Some(file.into());
        match self {
            Self::Parse { locale, source, .. } => Self::Parse {
                path: file,
                locale,
                source,
            },
            Self::NotAnObject { locale, .. } => Self::NotAnObject { path: file, locale },
            Self::InvalidEntry {
                locale,
                key,
                reason,
                ..
            } => Self::InvalidEntry {
                path: file,
                locale,
                key,
                reason,
            },
            other => other,
        }
    }

    /// Locale the failing document belongs to, when known.
    #[must_use]
    pub fn locale(&self) -> Option<&str> {
        match self {
            Self::Parse { locale, .. }
            | Self::NotAnObject { locale, .. }
            | Self::InvalidEntry { locale, .. } => Some(locale),
            Self::Io { .. } | Self::NoTranslations { .. } => None,
        }
    }
}

struct Origin<'a>(&'a Option<PathBuf>);

impl fmt::Display for Origin<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(path) => write!(f, " in {}", path.display()),
            None => Ok(()),
        }
    }
}

impl fmt::Display for I18nError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "reading {}: {source}", path.display()),
            Self::Parse {
                path,
                locale,
                source,
            } => write!(
                f,
                "malformed translations for locale '{locale}'{}: {source}",
                Origin(path)
            ),
            Self::NotAnObject { path, locale } => write!(
                f,
                "translations for locale '{locale}'{} must be a JSON object",
                Origin(path)
            ),
            Self::InvalidEntry {
                path,
                locale,
                key,
                reason,
            } => write!(
                f,
                "invalid entry '{key}' for locale '{locale}'{}: {reason}",
                Origin(path)
            ),
            Self::NoTranslations { path } => {
                write!(f, "no translation files found under {}", path.display())
            }
        }
    }
}

impl std::error::Error for I18nError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}
