//! Theme descriptors and the renderer that turns them into card images.
//!
//! Every supported theme is one [`ThemeDescriptor`] in the [`registry`]. A
//! descriptor is decoded into a [`LayerStack`]: background, thumbnail, then
//! the name, author and requester labels.

pub mod registry;

use crate::accent::FALLBACK_ACCENT;
use crate::card::CardText;
use crate::catalog::AssetCatalog;
use crate::error::{Error, Result};
use crate::image::{Bitmap, Color, Shape};
use crate::layer::{ArtworkLayer, BackgroundLayer, LabelLayer, LabelX, LayerStack, Overlay};
use crate::text::FontSpec;

use rand::seq::SliceRandom;
use rand::Rng;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name preferred as the top layer of dual-layer backgrounds.
pub const SECONDARY_BACKGROUND: &str = "2.png";

#[derive(Debug, Clone, PartialEq)]
pub struct ThemeDescriptor {
    pub name: &'static str,
    pub width: i32,
    pub height: i32,
    pub background: BackgroundMode,
    pub thumbnail: ThumbnailGeometry,
    pub text: TextLayout,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum BackgroundMode {
    /// One image picked at random.
    Single,
    /// A random base image with `2.png` (or another pick) on top, then an
    /// optional tint.
    Dual { overlay: Option<Overlay> },
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ThumbnailGeometry {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub shape: Shape,
    pub border: Option<Border>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Border {
    pub fill: Fill,
    pub width: f64,
}

/// Where a text or border color comes from.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Fill {
    Hex(&'static str),
    /// Uniform pick from a fixed palette.
    Palette(&'static [&'static str]),
    /// The resolved accent color.
    Accent,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Anchor {
    At(f64),
    /// `author.x + width(author) + gap`, on the requester's own baseline.
    AfterAuthor { gap: f64 },
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextSlot {
    pub x: Anchor,
    pub y: f64,
    pub font: FontSpec,
    pub fill: Fill,
    /// Fixed text drawn before the field value.
    pub prefix: &'static str,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextLayout {
    pub name: TextSlot,
    pub author: TextSlot,
    pub requester: TextSlot,
}

impl Fill {
    pub fn pick<R: Rng + ?Sized>(&self, accent: &str, rng: &mut R) -> Color {
        match self {
            Fill::Hex(hex) => parse_or(hex, Color::WHITE),
            Fill::Palette(colors) => colors
                .choose(rng)
                .map(|hex| parse_or(hex, Color::WHITE))
                .unwrap_or(Color::WHITE),
            Fill::Accent => accent.parse().unwrap_or_else(|_| {
                warn!(accent, "accent is not a hex color, using fallback");
                parse_or(FALLBACK_ACCENT, Color::WHITE)
            }),
        }
    }
}

fn parse_or(hex: &str, default: Color) -> Color {
    hex.parse().unwrap_or_else(|e| {
        warn!(hex, error = e, "invalid theme color");
        default
    })
}

impl BackgroundMode {
    /// Picks the base image and, for dual layers, the image drawn on top.
    pub fn select<'a, R: Rng + ?Sized>(
        &self,
        candidates: &'a [PathBuf],
        rng: &mut R,
    ) -> Option<(&'a Path, Option<&'a Path>)> {
        let primary = candidates.choose(rng)?;
        match self {
            BackgroundMode::Single => Some((primary.as_path(), None)),
            BackgroundMode::Dual { .. } => {
                let preferred = candidates
                    .iter()
                    .find(|p| p.file_name() == Some(OsStr::new(SECONDARY_BACKGROUND)));
                let others: Vec<&PathBuf> = candidates.iter().filter(|p| *p != primary).collect();
                let secondary = preferred
                    .or_else(|| others.choose(rng).copied())
                    .unwrap_or(primary);
                Some((primary.as_path(), Some(secondary.as_path())))
            }
        }
    }

    fn overlay(&self) -> Option<Overlay> {
        match self {
            BackgroundMode::Single => None,
            BackgroundMode::Dual { overlay } => *overlay,
        }
    }
}

impl ThemeDescriptor {
    /// Builds the layer stack for one card. Background files are read here so
    /// drawing itself never touches the disk.
    pub fn decode<R: Rng + ?Sized>(
        &self,
        catalog: &AssetCatalog,
        text: &CardText,
        accent: &str,
        thumbnail: &Bitmap,
        rng: &mut R,
    ) -> Result<LayerStack> {
        let candidates = catalog.list_images(self.name);
        let (primary, secondary) = self
            .background
            .select(&candidates, rng)
            .ok_or_else(|| Error::no_background(self.name))?;
        debug!(theme = self.name, ?primary, ?secondary, "selected background");

        let mut stack = LayerStack::new(self.width, self.height);
        stack.push(BackgroundLayer {
            primary: Bitmap::open(primary)?,
            secondary: secondary.map(Bitmap::open).transpose()?,
            overlay: self.background.overlay(),
        });

        let geo = &self.thumbnail;
        stack.push(ArtworkLayer {
            bitmap: thumbnail.clone(),
            x: geo.x,
            y: geo.y,
            w: geo.w,
            h: geo.h,
            shape: geo.shape,
            border: geo.border.map(|b| (b.fill.pick(accent, rng), b.width)),
        });

        for label in self.labels(text, accent, rng) {
            stack.push(label);
        }
        Ok(stack)
    }

    /// Name, author and requester labels. A requester anchored after the
    /// author measures the author text, prefix included, in the author's font.
    pub fn labels<R: Rng + ?Sized>(
        &self,
        text: &CardText,
        accent: &str,
        rng: &mut R,
    ) -> [LabelLayer; 3] {
        let layout = &self.text;
        let author_text = format!("{}{}", layout.author.prefix, text.author);
        let author_x = match layout.author.x {
            Anchor::At(x) => x,
            Anchor::AfterAuthor { .. } => 0.0,
        };
        [
            (&layout.name, &text.name),
            (&layout.author, &text.author),
            (&layout.requester, &text.requester),
        ]
        .map(|(slot, value)| LabelLayer {
            text: format!("{}{}", slot.prefix, value),
            x: match slot.x {
                Anchor::At(x) => LabelX::At(x),
                Anchor::AfterAuthor { gap } => LabelX::After {
                    text: author_text.clone(),
                    x: author_x,
                    font: layout.author.font,
                    gap,
                },
            },
            y: slot.y,
            font: slot.font,
            color: slot.fill.pick(accent, rng),
        })
    }
}

/// Dispatches a theme name to its descriptor and renders it.
#[derive(Debug, Clone, Copy)]
pub struct ThemeRenderer<'a> {
    catalog: &'a AssetCatalog,
    report_url: Option<&'a str>,
}

impl<'a> ThemeRenderer<'a> {
    pub fn new(catalog: &'a AssetCatalog) -> Self {
        Self {
            catalog,
            report_url: None,
        }
    }

    pub fn with_report_url(mut self, url: Option<&'a str>) -> Self {
        self.report_url = url;
        self
    }

    /// The descriptor for `name`, or an error telling a theme that only lacks
    /// a renderer apart from one that doesn't exist at all.
    pub fn resolve(&self, name: &str) -> Result<&'static ThemeDescriptor> {
        if let Some(descriptor) = registry::find(name) {
            return Ok(descriptor);
        }
        let available = self.catalog.list_themes();
        if available.iter().any(|t| t == name) {
            Err(Error::unimplemented_theme(
                name,
                self.report_url.map(str::to_string),
            ))
        } else {
            Err(Error::unknown_theme(name, available))
        }
    }

    pub fn render_with_rng<R: Rng + ?Sized>(
        &self,
        name: &str,
        text: &CardText,
        accent: &str,
        thumbnail: &Bitmap,
        rng: &mut R,
    ) -> Result<Vec<u8>> {
        let descriptor = self.resolve(name)?;
        descriptor
            .decode(self.catalog, text, accent, thumbnail, rng)?
            .render_png()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(|n| PathBuf::from("bg").join(n)).collect()
    }

    #[test]
    fn single_mode_picks_one_candidate() {
        let candidates = paths(&["1.png", "2.png", "3.png"]);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let (primary, secondary) = BackgroundMode::Single.select(&candidates, &mut rng).unwrap();
            assert!(candidates.iter().any(|c| c == primary));
            assert!(secondary.is_none());
        }
    }

    #[test]
    fn dual_mode_prefers_second_png() {
        let candidates = paths(&["1.png", "2.png", "3.png"]);
        let mode = BackgroundMode::Dual { overlay: None };
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            let (_, secondary) = mode.select(&candidates, &mut rng).unwrap();
            assert_eq!(secondary, Some(Path::new("bg/2.png")));
        }
    }

    #[test]
    fn dual_mode_falls_back_to_another_pick_then_itself() {
        let mode = BackgroundMode::Dual { overlay: None };
        let mut rng = StdRng::seed_from_u64(3);
        let two = paths(&["a.png", "b.png"]);
        for _ in 0..20 {
            let (primary, secondary) = mode.select(&two, &mut rng).unwrap();
            assert_ne!(Some(primary), secondary);
        }
        let one = paths(&["a.png"]);
        let (primary, secondary) = mode.select(&one, &mut rng).unwrap();
        assert_eq!(Some(primary), secondary);
    }

    #[test]
    fn empty_candidates_select_nothing() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(BackgroundMode::Single.select(&[], &mut rng).is_none());
    }

    #[test]
    fn fills_resolve_colors() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            Fill::Hex("#ffffff").pick("000000", &mut rng),
            Color::WHITE
        );
        assert_eq!(
            Fill::Accent.pick("000000", &mut rng).rgb8(),
            (0, 0, 0)
        );
        assert_eq!(Fill::Accent.pick("zzz", &mut rng).hex(), FALLBACK_ACCENT);
        let palette = &["#ff0000", "#00ff00"];
        let picked = Fill::Palette(palette).pick("", &mut rng).hex();
        assert!(picked == "ff0000" || picked == "00ff00");
    }

    #[test]
    fn seeded_palette_picks_repeat() {
        let palette = &["#111111", "#222222", "#333333", "#444444"];
        let fill = Fill::Palette(palette);
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..8).map(|_| fill.pick("", &mut rng).hex()).collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn requester_follows_the_measured_author() {
        let theme = registry::find("themes19").unwrap();
        let text = CardText::new("Ash Again", "Gawr Gura", "ZenKho");
        let mut rng = StdRng::seed_from_u64(0);
        let [name, author, requester] = theme.labels(&text, "6432c8", &mut rng);
        assert_eq!(name.x, LabelX::At(360.0));
        assert_eq!(author.x, LabelX::At(360.0));
        assert_eq!(author.text, "Gawr Gura");
        assert_eq!(requester.text, "ZenKho");
        assert_eq!(requester.y, author.y);

        let Anchor::AfterAuthor { gap } = theme.text.requester.x else {
            panic!("themes19 requester is not anchored after the author");
        };
        assert_eq!(
            requester.x,
            LabelX::After {
                text: String::from("Gawr Gura"),
                x: 360.0,
                font: theme.text.author.font,
                gap,
            }
        );

        let surface = crate::image::new_canvas(10, 10).unwrap();
        let cr = cairo::Context::new(&surface).unwrap();
        let width = crate::text::measure(&cr, "Gawr Gura", &theme.text.author.font);
        assert!(width > 0.0);
        assert_eq!(requester.x.resolve(&cr), 360.0 + width + gap);
    }

    #[test]
    fn prefixes_are_drawn_before_values() {
        let theme = registry::find("zk").unwrap();
        let text = CardText::new("n", "a", "ZenKho");
        let mut rng = StdRng::seed_from_u64(0);
        let [_, _, requester] = theme.labels(&text, "ffffff", &mut rng);
        assert_eq!(requester.text, "Requested by ZenKho");
        assert!(matches!(requester.x, LabelX::At(_)));
    }
}
