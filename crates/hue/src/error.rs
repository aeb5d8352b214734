#![forbid(unsafe_code)]

//! Unified error type for Hue apps.
//!
//! Each subsystem keeps its own error enum; [`Error`] wraps them so startup
//! code can use `?` across theme parsing, translation loading and
//! configuration without boxing.

use std::fmt;

use hue_i18n::I18nError;
use hue_runtime::{ConfigError, LocaleError};
use hue_style::ThemeError;

/// Top-level error type for Hue apps.
#[derive(Debug)]
pub enum Error {
    /// Theme mode or color value failed to parse.
    Theme(ThemeError),
    /// Translation files could not be loaded.
    I18n(I18nError),
    /// Configuration could not be loaded or is invalid.
    Config(ConfigError),
    /// A locale tag could not be parsed.
    Locale(LocaleError),
    /// Raw I/O error (convenience variant for `?` on io::Result).
    Io(std::io::Error),
}

/// Standard result type for Hue APIs.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Error type label for logs.
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Theme(_) => "theme",
            Self::I18n(_) => "i18n",
            Self::Config(_) => "config",
            Self::Locale(_) => "locale",
            Self::Io(_) => "io",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Theme(err) => write!(f, "{err}"),
            Self::I18n(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
            Self::Locale(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "I/O: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Theme(err) => Some(err),
            Self::I18n(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::Locale(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<ThemeError> for Error {
    fn from(err: ThemeError) -> Self {
        Self::Theme(err)
    }
}

impl From<I18nError> for Error {
    fn from(err: I18nError) -> Self {
        Self::I18n(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<LocaleError> for Error {
    fn from(err: LocaleError) -> Self {
        Self::Locale(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
