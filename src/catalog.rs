//! Discovery of theme folders and their background images.
//!
//! Layout: `<root>/<theme>/*.{png,jpg,jpeg,gif,webp,bmp}`. Every query scans
//! the disk again; nothing is cached.

use itertools::Itertools;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::warn;

pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeEntry {
    pub name: String,
    pub backgrounds: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AssetCatalog {
    root: PathBuf,
}

impl AssetCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every theme folder holding at least one image, sorted by name.
    pub fn entries(&self) -> Vec<ThemeEntry> {
        let dir = match fs::read_dir(&self.root) {
            Ok(dir) => dir,
            Err(e) => {
                warn!(root = %self.root.display(), error = %e, "cannot read images folder");
                return Vec::new();
            }
        };
        dir.filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .map(|name| ThemeEntry {
                backgrounds: self.scan(&name),
                name,
            })
            .filter(|entry| !entry.backgrounds.is_empty())
            .sorted_by(|a, b| a.name.cmp(&b.name))
            .collect()
    }

    pub fn list_themes(&self) -> Vec<String> {
        self.entries().into_iter().map(|e| e.name).collect()
    }

    /// Background candidates of `theme`, sorted by file name.
    pub fn list_images(&self, theme: &str) -> Vec<PathBuf> {
        if !is_plain_name(theme) {
            return Vec::new();
        }
        self.scan(theme)
    }

    pub fn contains(&self, theme: &str) -> bool {
        !self.list_images(theme).is_empty()
    }

    fn scan(&self, theme: &str) -> Vec<PathBuf> {
        let folder = self.root.join(theme);
        let dir = match fs::read_dir(&folder) {
            Ok(dir) => dir,
            Err(e) => {
                warn!(theme, error = %e, "cannot read theme folder");
                return Vec::new();
            }
        };
        dir.filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && has_image_extension(path))
            .sorted()
            .collect()
    }
}

pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// A single normal path component, so theme names can't escape the root.
fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
