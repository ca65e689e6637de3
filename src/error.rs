//! Common error types.

use itertools::Itertools;
use std::path::Path;

/// A shortcut type equivalent to `Result<T, zkcard::Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error that occurs within the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("unknown theme `{name}`, available themes: {}", .available.iter().join(", "))]
    UnknownTheme { name: String, available: Vec<String> },
    #[error("theme `{name}` has images but no renderer yet, please report it{}", .report.as_ref().map(|url| format!(" at {url}")).unwrap_or_default())]
    ThemeUnimplemented { name: String, report: Option<String> },
    #[error("no images found in theme folder `{0}`")]
    NoBackground(String),
    #[error("failed to open image `{0}`: {1}")]
    FailedOpenImage(String, String),
    #[error("failed to decode image: {0}")]
    Decode(String),
    #[error("failed to fetch `{0}`: {1}")]
    Fetch(String, String),
    #[error("failed to extract color: {0}")]
    ColorExtraction(&'static str),
    #[error("failed to load font `{0}`: {1}")]
    LoadFontError(String, String),
    #[error("failed to open config `{0}`: {1}")]
    ConfigOpen(String, String),
    #[error("failed to read config `{0}`: {1}")]
    ConfigDeser(String, String),
    #[error("vips error: {0}")]
    VipsError(String),
    #[error("cairo error: {0}")]
    CairoError(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn config_open(path: impl AsRef<Path>, e: impl ToString) -> Self {
        Self::ConfigOpen(path.as_ref().display().to_string(), e.to_string())
    }

    pub fn config_deser(path: impl AsRef<Path>, e: impl ToString) -> Self {
        Self::ConfigDeser(path.as_ref().display().to_string(), e.to_string())
    }

    pub fn open_image(path: impl AsRef<Path>, e: impl ToString) -> Self {
        Self::FailedOpenImage(path.as_ref().display().to_string(), e.to_string())
    }

    pub fn fetch(url: impl AsRef<str>, e: impl ToString) -> Self {
        Self::Fetch(url.as_ref().to_string(), e.to_string())
    }

    pub fn load_font(key: impl AsRef<str>, e: impl ToString) -> Self {
        Self::LoadFontError(key.as_ref().to_string(), e.to_string())
    }

    pub fn no_background(theme: impl AsRef<str>) -> Self {
        Self::NoBackground(theme.as_ref().to_string())
    }

    pub fn unknown_theme(name: impl AsRef<str>, available: Vec<String>) -> Self {
        Self::UnknownTheme {
            name: name.as_ref().to_string(),
            available,
        }
    }

    pub fn unimplemented_theme(name: impl AsRef<str>, report: Option<String>) -> Self {
        Self::ThemeUnimplemented {
            name: name.as_ref().to_string(),
            report,
        }
    }
}

impl From<cairo::Error> for Error {
    fn from(e: cairo::Error) -> Self {
        Self::CairoError(e.to_string())
    }
}
