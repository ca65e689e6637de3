//! Represents a single line of card text.

use crate::error::Result;
use crate::image::Color;
use crate::layer::{Layer, RenderContext};
use crate::text::{self, FontSpec};

use cairo::Context;

/// Horizontal placement of a label.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelX {
    At(f64),
    /// Right after another piece of text: `x + width(text) + gap`.
    After {
        text: String,
        x: f64,
        font: FontSpec,
        gap: f64,
    },
}

impl LabelX {
    pub fn resolve(&self, cr: &Context) -> f64 {
        match self {
            LabelX::At(x) => *x,
            LabelX::After { text, x, font, gap } => x + text::measure(cr, text, font) + gap,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LabelLayer {
    pub text: String,
    pub x: LabelX,
    /// Baseline.
    pub y: f64,
    pub font: FontSpec,
    pub color: Color,
}

impl Layer for LabelLayer {
    fn render(&self, cr: &Context, _ctx: &RenderContext) -> Result<()> {
        if self.text.is_empty() {
            return Ok(());
        }
        let x = self.x.resolve(cr);
        text::show(cr, &self.text, x, self.y, &self.font, self.color);
        Ok(())
    }
}
