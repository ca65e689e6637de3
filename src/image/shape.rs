//! Thumbnail outlines: plain rectangles, rounded rectangles and circles.

use crate::error::Result;
use crate::image::{paint_scaled, Bitmap};

use cairo::{Context, ImageSurface, Operator};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Shape {
    Rect,
    Rounded { radius: f64 },
    Circle,
}

impl Shape {
    /// Appends the outline of the shape inside `(x, y, w, h)` to the current path.
    pub fn trace(&self, cr: &Context, x: f64, y: f64, w: f64, h: f64) {
        cr.new_path();
        match *self {
            Shape::Rect => cr.rectangle(x, y, w, h),
            Shape::Rounded { radius } => rounded_rect(cr, x, y, w, h, radius),
            Shape::Circle => {
                let r = w.min(h) / 2.0;
                cr.arc(x + w / 2.0, y + h / 2.0, r, 0.0, TAU);
                cr.close_path();
            }
        }
    }

    /// Draws the centered square crop of `bitmap` into a `w`×`h` surface masked
    /// to this shape.
    pub fn prepare(&self, bitmap: &Bitmap, w: i32, h: i32) -> Result<ImageSurface> {
        let src = bitmap.to_surface()?;
        let (ox, oy, size) = bitmap.square_crop();
        let canvas = crate::image::new_canvas(w, h)?;
        let cr = Context::new(&canvas)?;
        let (fw, fh) = (w as f64, h as f64);

        if let Shape::Rounded { .. } = self {
            self.trace(&cr, 0.0, 0.0, fw, fh);
            cr.clip();
        }
        let (sx, sy) = (fw / size, fh / size);
        let (iw, ih) = (bitmap.width() as f64, bitmap.height() as f64);
        paint_scaled(&cr, &src, -ox * sx, -oy * sy, iw * sx, ih * sy)?;

        if let Shape::Circle = self {
            let mask = crate::image::new_canvas(w, h)?;
            {
                let mcr = Context::new(&mask)?;
                mcr.set_source_rgba(0.0, 0.0, 0.0, 1.0);
                self.trace(&mcr, 0.0, 0.0, fw, fh);
                mcr.fill()?;
            }
            cr.reset_clip();
            cr.set_operator(Operator::DestIn);
            cr.set_source_surface(&mask, 0.0, 0.0)?;
            cr.paint()?;
        }
        drop(cr);
        canvas.flush();
        Ok(canvas)
    }
}

/// Rounded rectangle built from four quarter arcs. The radius is clamped to
/// half the shorter side.
pub fn rounded_rect(cr: &Context, x: f64, y: f64, w: f64, h: f64, radius: f64) {
    let r = radius.clamp(0.0, w.min(h) / 2.0);
    cr.new_sub_path();
    cr.arc(x + w - r, y + r, r, -FRAC_PI_2, 0.0);
    cr.arc(x + w - r, y + h - r, r, 0.0, FRAC_PI_2);
    cr.arc(x + r, y + h - r, r, FRAC_PI_2, PI);
    cr.arc(x + r, y + r, r, PI, PI + FRAC_PI_2);
    cr.close_path();
}
