//! Implements utilities to create color values.

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static HEX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#?([0-9a-fA-F]{2})([0-9a-fA-F]{2})([0-9a-fA-F]{2})([0-9a-fA-F]{2})?$")
        .expect("hex color pattern")
});

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: Option<f64>,
}

impl Color {
    pub const WHITE: Color = Color::opaque(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::opaque(0.0, 0.0, 0.0);

    pub const fn opaque(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: None }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::opaque(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
    }

    pub fn rgb(&self) -> (f64, f64, f64) {
        (self.r, self.g, self.b)
    }

    pub fn rgba(&self) -> (f64, f64, f64, f64) {
        (self.r, self.g, self.b, self.a.unwrap_or(1.0))
    }

    pub fn rgb8(&self) -> (u8, u8, u8) {
        let c = |x: f64| (x.clamp(0.0, 1.0) * 255.0).round() as u8;
        (c(self.r), c(self.g), c(self.b))
    }

    /// Lowercase `rrggbb` form without a leading `#`.
    pub fn hex(&self) -> String {
        let (r, g, b) = self.rgb8();
        format!("{r:02x}{g:02x}{b:02x}")
    }

    pub fn has_alpha(&self) -> bool {
        self.a.is_some()
    }

    /// Sets the source color of a cairo context.
    pub fn apply(&self, cr: &cairo::Context) {
        let (r, g, b, a) = self.rgba();
        cr.set_source_rgba(r, g, b, a);
    }
}

impl FromStr for Color {
    type Err = &'static str;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = HEX_RE
            .captures(s.trim())
            .ok_or("string not in form #RRGGBB or #RRGGBBAA")?;
        let mut values = captures.iter().skip(1).map(|c| {
            c.and_then(|v| u8::from_str_radix(v.as_str(), 16).ok())
                .map(|x| x as f64 / 255.0)
        });
        let mut next = || values.next().flatten();
        let r = next().unwrap_or(0.0);
        let g = next().unwrap_or(0.0);
        let b = next().unwrap_or(0.0);
        let a = next();
        Ok(Color { r, g, b, a })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b) = self.rgb8();
        if let Some(a) = self.a {
            let a = (a.clamp(0.0, 1.0) * 255.0).round() as u8;
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}", r, g, b)
        }
    }
}
