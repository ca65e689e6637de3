//! Renderer configuration.

use crate::error::{Error, Result};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Root folder holding one sub-folder of background images per theme.
    pub images: PathBuf,
    /// Fallback thumbnail, `<images>/avatar.png` when omitted.
    pub avatar: Option<PathBuf>,
    pub default_theme: String,
    /// Font files registered under a key usable in theme font lists.
    pub fonts: BTreeMap<String, PathBuf>,
    pub fetch: FetchConfig,
    /// Where users should report themes that have images but no renderer.
    pub report_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

const DEFAULT_FONTS: [(&str, &str); 5] = [
    ("circular-std", "fonts/circularstd-black.otf"),
    ("noto-sans-jp", "fonts/notosans-jp-black.ttf"),
    ("noto-sans", "fonts/notosans-black.ttf"),
    ("noto-emoji", "fonts/notoemoji-bold.ttf"),
    ("noto-sans-kr", "fonts/notosans-kr-black.ttf"),
];

impl Default for Config {
    fn default() -> Self {
        Self {
            images: PathBuf::from("images"),
            avatar: None,
            default_theme: String::from("classic"),
            fonts: DEFAULT_FONTS
                .iter()
                .map(|(k, v)| (k.to_string(), PathBuf::from(v)))
                .collect(),
            fetch: FetchConfig::default(),
            report_url: None,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: String::from(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            ),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Reads a TOML config, resolving relative paths against its folder.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::config_open(path, e))?;
        let raw: Self = toml::from_str(&content).map_err(|e| Error::config_deser(path, e))?;
        let folder = path.parent().unwrap_or(Path::new("")).to_path_buf();
        Ok(raw.relative_to(&folder))
    }

    /// Prefixes every relative path in the config with `folder`.
    pub fn relative_to(self, folder: &Path) -> Self {
        let prefix = |p: PathBuf| if p.is_absolute() { p } else { folder.join(p) };
        Self {
            images: prefix(self.images),
            avatar: self.avatar.map(prefix),
            fonts: self
                .fonts
                .into_iter()
                .map(|(k, v)| (k, prefix(v)))
                .collect(),
            ..self
        }
    }

    pub fn avatar_path(&self) -> PathBuf {
        self.avatar
            .clone()
            .unwrap_or_else(|| self.images.join("avatar.png"))
    }

    pub fn with_images(mut self, images: impl Into<PathBuf>) -> Self {
        self.images = images.into();
        self
    }

    pub fn with_avatar(mut self, avatar: impl Into<PathBuf>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    pub fn with_default_theme(mut self, theme: impl Into<String>) -> Self {
        self.default_theme = theme.into();
        self
    }
}
