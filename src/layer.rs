//! Implements abstract layers that are composited onto a card canvas.

mod artwork;
mod background;
mod label;

pub use artwork::ArtworkLayer;
pub use background::{BackgroundLayer, Overlay};
pub use label::{LabelLayer, LabelX};

use crate::error::Result;
use crate::image;

use cairo::{Context, ImageSurface};
use core::fmt::Debug;

#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
    pub width: f64,
    pub height: f64,
}

pub trait Layer: Debug + Send {
    fn render(&self, cr: &Context, ctx: &RenderContext) -> Result<()>;
}

/// Layers drawn bottom to top on a transparent canvas.
#[derive(Debug)]
pub struct LayerStack {
    pub size: (i32, i32),
    pub layers: Vec<Box<dyn Layer>>,
}

impl LayerStack {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            size: (width, height),
            layers: Vec::new(),
        }
    }

    pub fn push(&mut self, layer: impl Layer + 'static) {
        self.layers.push(Box::new(layer));
    }

    pub fn render(self) -> Result<ImageSurface> {
        let (w, h) = self.size;
        let canvas = image::new_canvas(w, h)?;
        {
            let cr = Context::new(&canvas)?;
            let ctx = RenderContext {
                width: w as f64,
                height: h as f64,
            };
            for layer in self.layers.iter() {
                cr.save()?;
                layer.render(&cr, &ctx)?;
                cr.restore()?;
            }
        }
        canvas.flush();
        Ok(canvas)
    }

    pub fn render_png(self) -> Result<Vec<u8>> {
        let canvas = self.render()?;
        image::encode_png(&canvas)
    }
}
