//! Full-canvas background images, optionally stacked two deep with a fade.

use crate::error::Result;
use crate::image::{self, Bitmap, Color};
use crate::layer::{Layer, RenderContext};

use cairo::{Context, LinearGradient};
use tracing::warn;

/// Tint painted over a dual-layer background.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Overlay {
    Flat(&'static str),
    /// Horizontal fade from the left edge color to the right edge color.
    Gradient {
        from: &'static str,
        to: &'static str,
    },
}

impl Overlay {
    fn paint(&self, cr: &Context, ctx: &RenderContext) -> Result<()> {
        match *self {
            Overlay::Flat(hex) => parse(hex).apply(cr),
            Overlay::Gradient { from, to } => {
                let gradient = LinearGradient::new(0.0, 0.0, ctx.width, 0.0);
                let (r, g, b, a) = parse(from).rgba();
                gradient.add_color_stop_rgba(0.0, r, g, b, a);
                let (r, g, b, a) = parse(to).rgba();
                gradient.add_color_stop_rgba(1.0, r, g, b, a);
                cr.set_source(&gradient)?;
            }
        }
        cr.rectangle(0.0, 0.0, ctx.width, ctx.height);
        cr.fill()?;
        Ok(())
    }
}

fn parse(hex: &str) -> Color {
    hex.parse().unwrap_or_else(|e| {
        warn!(hex, error = e, "invalid overlay color");
        Color::default()
    })
}

#[derive(Debug)]
pub struct BackgroundLayer {
    pub primary: Bitmap,
    pub secondary: Option<Bitmap>,
    pub overlay: Option<Overlay>,
}

impl Layer for BackgroundLayer {
    fn render(&self, cr: &Context, ctx: &RenderContext) -> Result<()> {
        for bitmap in std::iter::once(&self.primary).chain(self.secondary.as_ref()) {
            let surface = bitmap.to_surface()?;
            image::paint_scaled(cr, &surface, 0.0, 0.0, ctx.width, ctx.height)?;
        }
        if let Some(overlay) = &self.overlay {
            overlay.paint(cr, ctx)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::LayerStack;

    fn center_rgb(layer: BackgroundLayer) -> (u8, u8, u8) {
        let mut stack = LayerStack::new(20, 10);
        stack.push(layer);
        let mut surface = stack.render().unwrap();
        let stride = surface.stride() as usize;
        let data = surface.data().unwrap();
        let at = 5 * stride + 10 * 4;
        let px = u32::from_ne_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]]);
        assert_eq!(px >> 24, 255);
        ((px >> 16) as u8, (px >> 8) as u8, px as u8)
    }

    #[test]
    fn secondary_covers_primary() {
        let red = Bitmap::solid(4, 4, [255, 0, 0, 255]);
        let green = Bitmap::solid(4, 4, [0, 255, 0, 255]);
        let only = BackgroundLayer {
            primary: red.clone(),
            secondary: None,
            overlay: None,
        };
        assert_eq!(center_rgb(only), (255, 0, 0));
        let both = BackgroundLayer {
            primary: red,
            secondary: Some(green),
            overlay: None,
        };
        assert_eq!(center_rgb(both), (0, 255, 0));
    }

    #[test]
    fn opaque_overlay_tints_everything() {
        let layer = BackgroundLayer {
            primary: Bitmap::solid(4, 4, [255, 0, 0, 255]),
            secondary: Some(Bitmap::solid(4, 4, [0, 255, 0, 255])),
            overlay: Some(Overlay::Flat("#000000ff")),
        };
        assert_eq!(center_rgb(layer), Color::BLACK.rgb8());
    }

    #[test]
    fn half_overlay_darkens() {
        let layer = BackgroundLayer {
            primary: Bitmap::solid(4, 4, [255, 255, 255, 255]),
            secondary: None,
            overlay: Some(Overlay::Gradient {
                from: "#00000080",
                to: "#00000080",
            }),
        };
        let (r, g, b) = center_rgb(layer);
        assert!(r < 255 && r > 100, "{r}");
        assert_eq!((r, g, b), (r, r, r));
    }
}
