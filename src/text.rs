//! Single line text drawing on cairo contexts through pango.

mod font;

pub use font::{register, registered, FontMap};

use crate::image::Color;

use cairo::Context;

/// Font families (registered keys or system family names) and pixel size.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FontSpec {
    pub families: &'static [&'static str],
    pub size: f64,
}

impl FontSpec {
    pub const fn new(families: &'static [&'static str], size: f64) -> Self {
        Self { families, size }
    }

    pub fn description(&self) -> pango::FontDescription {
        let mut desc = pango::FontDescription::new();
        desc.set_family(&registered().family_list(self.families));
        desc.set_absolute_size(self.size * pango::SCALE as f64);
        desc
    }
}

fn layout(cr: &Context, text: &str, font: &FontSpec) -> pango::Layout {
    let layout = pangocairo::functions::create_layout(cr);
    layout.set_font_description(Some(&font.description()));
    layout.set_single_paragraph_mode(true);
    layout.set_text(text);
    layout
}

/// Logical width of `text` in pixels.
pub fn measure(cr: &Context, text: &str, font: &FontSpec) -> f64 {
    layout(cr, text, font).pixel_size().0 as f64
}

/// Draws `text` with its alphabetic baseline at `y`.
pub fn show(cr: &Context, text: &str, x: f64, y: f64, font: &FontSpec, color: Color) {
    let layout = layout(cr, text, font);
    let baseline = layout.baseline() as f64 / pango::SCALE as f64;
    color.apply(cr);
    cr.move_to(x, y - baseline);
    pangocairo::functions::show_layout(cr, &layout);
}
