//! Represents the track thumbnail, cropped square and masked to a shape.

use crate::error::Result;
use crate::image::{Bitmap, Color, Shape};
use crate::layer::{Layer, RenderContext};

use cairo::Context;

#[derive(Debug)]
pub struct ArtworkLayer {
    pub bitmap: Bitmap,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub shape: Shape,
    /// Stroke color and line width.
    pub border: Option<(Color, f64)>,
}

impl Layer for ArtworkLayer {
    fn render(&self, cr: &Context, _ctx: &RenderContext) -> Result<()> {
        let thumb = self
            .shape
            .prepare(&self.bitmap, self.w.round() as i32, self.h.round() as i32)?;
        cr.set_source_surface(&thumb, self.x, self.y)?;
        cr.paint()?;

        if let Some((color, width)) = self.border {
            self.shape.trace(cr, self.x, self.y, self.w, self.h);
            color.apply(cr);
            cr.set_line_width(width);
            cr.stroke()?;
        }
        Ok(())
    }
}
