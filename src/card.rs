//! The card builder and the renderer that turns it into PNG bytes.

use crate::accent;
use crate::catalog::AssetCatalog;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::image::ThumbnailLoader;
use crate::theme::ThemeRenderer;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

pub const DEFAULT_COLOR: &str = "ff0000";
pub const NAME_LIMIT: usize = 15;
pub const AUTHOR_LIMIT: usize = 15;
pub const REQUESTER_LIMIT: usize = 35;

const ELLIPSIS: &str = "...";

/// Cuts `text` to its first `limit` characters plus an ellipsis when it has
/// more than `limit` non-whitespace characters.
pub fn truncate(text: &str, limit: usize) -> String {
    let visible = text.chars().filter(|c| !c.is_whitespace()).count();
    if visible > limit {
        let mut cut: String = text.chars().take(limit).collect();
        cut.push_str(ELLIPSIS);
        cut
    } else {
        text.to_string()
    }
}

/// The three text fields as they are drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardText {
    pub name: String,
    pub author: String,
    pub requester: String,
}

impl CardText {
    pub fn new(name: &str, author: &str, requester: &str) -> Self {
        Self {
            name: truncate(name, NAME_LIMIT),
            author: truncate(author, AUTHOR_LIMIT),
            requester: truncate(requester, REQUESTER_LIMIT),
        }
    }
}

/// A card request. Unset optional fields are filled in at render time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardSpec {
    pub name: Option<String>,
    pub author: Option<String>,
    pub requester: Option<String>,
    /// `"auto"` or a hex color, with or without `#`.
    pub color: Option<String>,
    pub theme: Option<String>,
    pub brightness: Option<i32>,
    /// Local path, data URI or http(s) URL.
    pub thumbnail: Option<String>,
}

impl CardSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_requester(mut self, requester: impl Into<String>) -> Self {
        self.requester = Some(requester.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    pub fn with_brightness(mut self, brightness: i32) -> Self {
        self.brightness = Some(brightness);
        self
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    /// Renders with the default configuration.
    pub async fn build(&self) -> Result<Vec<u8>> {
        CardRenderer::new(Config::default())?.render(self).await
    }

    /// Checks the required fields and fills in every default.
    pub fn resolve(&self, config: &Config) -> Result<ResolvedCard> {
        let name = required(&self.name, "name")?;
        let author = required(&self.author, "author")?;
        let requester = required(&self.requester, "requester")?;
        Ok(ResolvedCard {
            text: CardText::new(name, author, requester),
            color: optional(&self.color).unwrap_or(DEFAULT_COLOR).to_string(),
            theme: optional(&self.theme)
                .unwrap_or(&config.default_theme)
                .to_string(),
            brightness: self.brightness.unwrap_or(0),
            thumbnail: optional(&self.thumbnail)
                .map(str::to_string)
                .unwrap_or_else(|| config.avatar_path().display().to_string()),
        })
    }
}

/// Empty strings count as unset.
fn optional(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

fn required<'a>(field: &'a Option<String>, name: &'static str) -> Result<&'a str> {
    optional(field).ok_or(Error::MissingField(name))
}

/// A validated card with every default applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCard {
    pub text: CardText,
    pub color: String,
    pub theme: String,
    pub brightness: i32,
    pub thumbnail: String,
}

#[derive(Debug, Clone)]
pub struct CardRenderer {
    config: Config,
    catalog: AssetCatalog,
    loader: ThumbnailLoader,
}

impl CardRenderer {
    pub fn new(config: Config) -> Result<Self> {
        crate::setup(&config)?;
        let catalog = AssetCatalog::new(&config.images);
        let loader = ThumbnailLoader::new(&config)?;
        Ok(Self {
            config,
            catalog,
            loader,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    pub async fn render(&self, spec: &CardSpec) -> Result<Vec<u8>> {
        let mut rng = StdRng::from_entropy();
        self.render_with_rng(spec, &mut rng).await
    }

    /// Renders `spec`, drawing background and palette choices from `rng`.
    pub async fn render_with_rng<R: Rng + ?Sized>(
        &self,
        spec: &CardSpec,
        rng: &mut R,
    ) -> Result<Vec<u8>> {
        let card = spec.resolve(&self.config)?;
        let themes = ThemeRenderer::new(&self.catalog)
            .with_report_url(self.config.report_url.as_deref());
        themes.resolve(&card.theme)?;

        let thumbnail = self.loader.load(Some(&card.thumbnail)).await;
        let accent = accent::resolve_with(&card.color, card.brightness, thumbnail.requested());
        debug!(theme = %card.theme, %accent, fallback = thumbnail.is_fallback(), "rendering card");

        let png = themes.render_with_rng(&card.theme, &card.text, &accent, &thumbnail.bitmap, rng)?;
        info!(theme = %card.theme, bytes = png.len(), "rendered card");
        Ok(png)
    }
}
