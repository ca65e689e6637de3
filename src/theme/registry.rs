//! The closed set of renderable themes.
//!
//! Four canvas families share their geometry: compact (800×200), wide
//! (1280×450), banner (1280×350) and poster (3264×765). Themes within a
//! family differ in thumbnail shape, palette and background mode.

use crate::image::Shape;
use crate::layer::Overlay;
use crate::text::FontSpec;
use crate::theme::{
    Anchor, BackgroundMode, Border, Fill, TextLayout, TextSlot, ThemeDescriptor,
    ThumbnailGeometry,
};

const CIRCULAR: &[&str] = &[
    "circular-std",
    "noto-sans-jp",
    "noto-sans",
    "noto-emoji",
    "noto-sans-kr",
];
const NOTO: &[&str] = &["noto-sans", "noto-sans-jp", "noto-emoji", "noto-sans-kr"];

const NEON: &[&str] = &["#ff00ff", "#00ffff", "#ffff00", "#ff3366"];
const PASTEL: &[&str] = &["#ffb3ba", "#ffdfba", "#ffffba", "#baffc9", "#bae1ff"];
const SUNSET: &[&str] = &["#ff7e5f", "#feb47b", "#ffcc70"];
const OCEAN: &[&str] = &["#a8e6ff", "#4fc3f7", "#e0f7fa"];

const WHITE: Fill = Fill::Hex("#ffffff");
const MUTED: Fill = Fill::Hex("#cfcfcf");
const DIM: Fill = Fill::Hex("#9e9e9e");
const INK: Fill = Fill::Hex("#1b1b1b");

const FADE_DARK: Overlay = Overlay::Flat("#00000066");
const FADE_LIGHT: Overlay = Overlay::Flat("#ffffff40");
const FADE_LEFT: Overlay = Overlay::Gradient {
    from: "#000000cc",
    to: "#00000000",
};

const fn slot(x: f64, y: f64, font: FontSpec, fill: Fill) -> TextSlot {
    TextSlot {
        x: Anchor::At(x),
        y,
        font,
        fill,
        prefix: "",
    }
}

const fn after_author(gap: f64, y: f64, font: FontSpec, fill: Fill) -> TextSlot {
    TextSlot {
        x: Anchor::AfterAuthor { gap },
        y,
        font,
        fill,
        prefix: "",
    }
}

const fn requested(mut slot: TextSlot) -> TextSlot {
    slot.prefix = "Requested by ";
    slot
}

const fn thumb(x: f64, y: f64, size: f64, shape: Shape, border: Option<Border>) -> ThumbnailGeometry {
    ThumbnailGeometry {
        x,
        y,
        w: size,
        h: size,
        shape,
        border,
    }
}

const fn border(fill: Fill, width: f64) -> Option<Border> {
    Some(Border { fill, width })
}

const ROUNDED_20: Shape = Shape::Rounded { radius: 20.0 };
const ROUNDED_30: Shape = Shape::Rounded { radius: 30.0 };
const ROUNDED_60: Shape = Shape::Rounded { radius: 60.0 };

/// 800×200: thumbnail on the left, three stacked lines.
const fn compact(
    name: &'static str,
    background: BackgroundMode,
    shape: Shape,
    frame: Option<Border>,
    title: Fill,
    author: Fill,
    requester: TextSlot,
) -> ThemeDescriptor {
    ThemeDescriptor {
        name,
        width: 800,
        height: 200,
        background,
        thumbnail: thumb(25.0, 25.0, 150.0, shape, frame),
        text: TextLayout {
            name: slot(200.0, 80.0, FontSpec::new(CIRCULAR, 32.0), title),
            author: slot(200.0, 120.0, FontSpec::new(CIRCULAR, 22.0), author),
            requester,
        },
    }
}

/// 1280×450: large thumbnail, big title.
const fn wide(
    name: &'static str,
    background: BackgroundMode,
    shape: Shape,
    frame: Option<Border>,
    title: Fill,
    author: Fill,
    requester: Fill,
) -> ThemeDescriptor {
    ThemeDescriptor {
        name,
        width: 1280,
        height: 450,
        background,
        thumbnail: thumb(50.0, 50.0, 350.0, shape, frame),
        text: TextLayout {
            name: slot(450.0, 170.0, FontSpec::new(CIRCULAR, 60.0), title),
            author: slot(450.0, 250.0, FontSpec::new(CIRCULAR, 40.0), author),
            requester: requested(slot(450.0, 340.0, FontSpec::new(NOTO, 30.0), requester)),
        },
    }
}

/// 1280×350: circular portrait, requester trailing the author.
const fn banner(
    name: &'static str,
    background: BackgroundMode,
    frame: Option<Border>,
    title: Fill,
    author: Fill,
    requester: Fill,
) -> ThemeDescriptor {
    ThemeDescriptor {
        name,
        width: 1280,
        height: 350,
        background,
        thumbnail: thumb(60.0, 50.0, 250.0, Shape::Circle, frame),
        text: TextLayout {
            name: slot(360.0, 150.0, FontSpec::new(CIRCULAR, 52.0), title),
            author: slot(360.0, 215.0, FontSpec::new(CIRCULAR, 34.0), author),
            requester: after_author(30.0, 215.0, FontSpec::new(NOTO, 26.0), requester),
        },
    }
}

/// 3264×765: dual background poster.
const fn poster(
    name: &'static str,
    overlay: Option<Overlay>,
    shape: Shape,
    frame: Option<Border>,
    title: Fill,
    author: Fill,
) -> ThemeDescriptor {
    ThemeDescriptor {
        name,
        width: 3264,
        height: 765,
        background: BackgroundMode::Dual { overlay },
        thumbnail: thumb(90.0, 90.0, 585.0, shape, frame),
        text: TextLayout {
            name: slot(800.0, 330.0, FontSpec::new(CIRCULAR, 140.0), title),
            author: slot(800.0, 480.0, FontSpec::new(CIRCULAR, 90.0), author),
            requester: requested(slot(800.0, 640.0, FontSpec::new(NOTO, 70.0), MUTED)),
        },
    }
}

const SINGLE: BackgroundMode = BackgroundMode::Single;

const fn dual(overlay: Overlay) -> BackgroundMode {
    BackgroundMode::Dual {
        overlay: Some(overlay),
    }
}

const REQ_BELOW: TextSlot = slot(200.0, 165.0, FontSpec::new(NOTO, 18.0), DIM);
const REQ_BELOW_ACCENT: TextSlot = slot(200.0, 165.0, FontSpec::new(NOTO, 18.0), Fill::Accent);
const REQ_TRAILING: TextSlot = after_author(20.0, 120.0, FontSpec::new(NOTO, 18.0), DIM);
const REQ_TRAILING_MUTED: TextSlot = after_author(20.0, 120.0, FontSpec::new(NOTO, 18.0), MUTED);

pub static THEMES: [ThemeDescriptor; 30] = [
    compact("classic", SINGLE, ROUNDED_20, border(Fill::Accent, 4.0), Fill::Accent, WHITE, REQ_BELOW),
    wide("zk", SINGLE, ROUNDED_30, border(WHITE, 6.0), Fill::Accent, WHITE, MUTED),
    compact("themes1", SINGLE, Shape::Rect, None, WHITE, MUTED, REQ_BELOW),
    compact("themes2", SINGLE, ROUNDED_20, None, Fill::Accent, WHITE, requested(REQ_BELOW)),
    compact("themes3", SINGLE, Shape::Circle, border(WHITE, 3.0), Fill::Accent, MUTED, REQ_TRAILING),
    compact("themes4", SINGLE, ROUNDED_20, border(Fill::Accent, 3.0), Fill::Accent, WHITE, REQ_TRAILING_MUTED),
    compact("themes5", SINGLE, ROUNDED_20, None, Fill::Palette(NEON), WHITE, REQ_BELOW),
    compact("themes6", SINGLE, Shape::Rect, border(INK, 4.0), INK, INK, slot(200.0, 165.0, FontSpec::new(NOTO, 18.0), INK)),
    compact("themes7", dual(FADE_DARK), ROUNDED_20, None, WHITE, Fill::Accent, REQ_BELOW),
    compact("themes8", dual(FADE_LEFT), Shape::Circle, border(Fill::Accent, 4.0), WHITE, MUTED, REQ_BELOW_ACCENT),
    compact("themes9", SINGLE, Shape::Circle, None, Fill::Palette(PASTEL), Fill::Palette(PASTEL), REQ_TRAILING_MUTED),
    compact("themes10", dual(FADE_LIGHT), ROUNDED_20, border(INK, 3.0), INK, INK, slot(200.0, 165.0, FontSpec::new(NOTO, 18.0), INK)),
    compact("themes11", SINGLE, Shape::Rect, border(Fill::Accent, 5.0), Fill::Accent, Fill::Accent, REQ_BELOW),
    compact("themes12", SINGLE, ROUNDED_20, border(WHITE, 2.0), Fill::Palette(SUNSET), WHITE, requested(REQ_BELOW)),
    wide("themes13", SINGLE, Shape::Rect, None, WHITE, MUTED, DIM),
    wide("themes14", SINGLE, ROUNDED_30, border(Fill::Accent, 8.0), WHITE, Fill::Accent, MUTED),
    wide("themes15", dual(FADE_DARK), ROUNDED_30, None, Fill::Accent, WHITE, MUTED),
    wide("themes16", dual(FADE_LEFT), Shape::Circle, border(WHITE, 6.0), WHITE, Fill::Palette(OCEAN), MUTED),
    wide("themes17", SINGLE, ROUNDED_30, None, Fill::Palette(NEON), Fill::Palette(NEON), WHITE),
    wide("themes18", SINGLE, Shape::Circle, border(Fill::Accent, 6.0), Fill::Accent, WHITE, Fill::Accent),
    banner("themes19", SINGLE, border(WHITE, 5.0), Fill::Accent, WHITE, MUTED),
    banner("themes20", SINGLE, None, WHITE, MUTED, DIM),
    banner("themes21", dual(FADE_DARK), border(Fill::Accent, 6.0), WHITE, Fill::Accent, MUTED),
    banner("themes22", dual(FADE_LEFT), border(WHITE, 4.0), Fill::Palette(SUNSET), WHITE, MUTED),
    banner("themes23", SINGLE, border(INK, 5.0), INK, INK, INK),
    banner("themes24", SINGLE, border(Fill::Accent, 5.0), Fill::Palette(PASTEL), WHITE, Fill::Accent),
    poster("themes25", Some(FADE_DARK), ROUNDED_60, border(WHITE, 12.0), Fill::Accent, WHITE),
    poster("themes26", Some(FADE_LEFT), Shape::Circle, border(Fill::Accent, 14.0), WHITE, MUTED),
    poster("themes27", None, ROUNDED_60, None, Fill::Palette(OCEAN), WHITE),
    poster("themes28", Some(FADE_LIGHT), Shape::Rect, border(INK, 10.0), INK, INK),
];

pub fn find(name: &str) -> Option<&'static ThemeDescriptor> {
    THEMES.iter().find(|t| t.name == name)
}

pub fn names() -> impl Iterator<Item = &'static str> {
    THEMES.iter().map(|t| t.name)
}
