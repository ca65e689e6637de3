//! Accent color resolution.
//!
//! An explicit color passes through with its leading `#` removed. `"auto"`
//! samples the dominant color of the thumbnail, shifts its brightness and
//! falls back to [`FALLBACK_ACCENT`] whenever sampling is impossible.

use crate::error::{Error, Result};
use crate::image::{Bitmap, ThumbnailLoader, ThumbnailSource};

use std::collections::HashMap;
use tracing::{debug, warn};

pub const AUTO: &str = "auto";
pub const FALLBACK_ACCENT: &str = "03fc3f";

const SAMPLE_STEP: usize = 10;
const MIN_ALPHA: u8 = 125;
const WHITE_LEVEL: u8 = 250;
const QUANT_SHIFT: u8 = 3;

/// Resolves `spec` against an already acquired thumbnail. `thumbnail` is
/// `None` when the requested image could not be loaded.
pub fn resolve_with(spec: &str, brightness: i32, thumbnail: Option<&Bitmap>) -> String {
    if spec != AUTO {
        return spec.strip_prefix('#').unwrap_or(spec).to_string();
    }
    let sampled = thumbnail
        .ok_or(Error::ColorExtraction("thumbnail unavailable"))
        .and_then(dominant_color);
    match sampled {
        Ok(rgb) => {
            let hex = to_hex(adjust_brightness(rgb, brightness));
            debug!(%hex, "sampled accent color");
            hex
        }
        Err(e) => {
            warn!(error = %e, "using fallback accent color");
            FALLBACK_ACCENT.to_string()
        }
    }
}

/// Resolves `spec`, fetching `source` on its own when sampling is needed.
pub async fn resolve_color(
    loader: &ThumbnailLoader,
    spec: &str,
    brightness: i32,
    source: Option<&str>,
) -> String {
    if spec != AUTO {
        return resolve_with(spec, brightness, None);
    }
    let source = ThumbnailSource::classify(source);
    let bitmap = match loader.fetch(&source).await {
        Ok(bitmap) => Some(bitmap),
        Err(e) => {
            debug!(error = %e, "accent sample unavailable");
            None
        }
    };
    resolve_with(spec, brightness, bitmap.as_ref())
}

/// Most common color of the image after 5-bit quantization, averaged over
/// the pixels of the winning bucket.
pub fn dominant_color(bitmap: &Bitmap) -> Result<(u8, u8, u8)> {
    let samples: Vec<[u8; 4]> = bitmap
        .pixels()
        .step_by(SAMPLE_STEP)
        .filter(|p| p[3] >= MIN_ALPHA)
        .collect();
    if samples.is_empty() {
        return Err(Error::ColorExtraction("image has no opaque pixels"));
    }
    let colored: Vec<&[u8; 4]> = samples
        .iter()
        .filter(|p| !(p[0] > WHITE_LEVEL && p[1] > WHITE_LEVEL && p[2] > WHITE_LEVEL))
        .collect();
    let pool = if colored.is_empty() {
        samples.iter().collect()
    } else {
        colored
    };

    let mut buckets: HashMap<u16, (u64, [u64; 3])> = HashMap::new();
    for p in pool {
        let key = ((p[0] >> QUANT_SHIFT) as u16) << 10
            | ((p[1] >> QUANT_SHIFT) as u16) << 5
            | (p[2] >> QUANT_SHIFT) as u16;
        let entry = buckets.entry(key).or_default();
        entry.0 += 1;
        for c in 0..3 {
            entry.1[c] += p[c] as u64;
        }
    }
    let (_, (count, sums)) = buckets
        .into_iter()
        .max_by(|(ka, (a, _)), (kb, (b, _))| a.cmp(b).then(kb.cmp(ka)))
        .ok_or(Error::ColorExtraction("no samples"))?;
    let mean = |s: u64| ((s + count / 2) / count) as u8;
    Ok((mean(sums[0]), mean(sums[1]), mean(sums[2])))
}

/// Adds `delta` to every channel, clamped to `0..=255`.
pub fn adjust_brightness((r, g, b): (u8, u8, u8), delta: i32) -> (u8, u8, u8) {
    let shift = |c: u8| (c as i32).saturating_add(delta).clamp(0, 255) as u8;
    (shift(r), shift(g), shift(b))
}

pub fn to_hex((r, g, b): (u8, u8, u8)) -> String {
    format!("{r:02x}{g:02x}{b:02x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_colors_pass_through() {
        assert_eq!(resolve_with("#abcdef", 40, None), "abcdef");
        assert_eq!(resolve_with("ABCDEF", 0, None), "ABCDEF");
        assert_eq!(resolve_with("not-a-color", 0, None), "not-a-color");
    }

    #[test]
    fn auto_without_thumbnail_falls_back() {
        assert_eq!(resolve_with(AUTO, 50, None), FALLBACK_ACCENT);
    }

    #[test]
    fn auto_samples_and_brightens() {
        let bmp = Bitmap::solid(20, 20, [100, 50, 200, 255]);
        assert_eq!(resolve_with(AUTO, 0, Some(&bmp)), "6432c8");
        assert_eq!(resolve_with(AUTO, 60, Some(&bmp)), "a06eff");
        assert_eq!(resolve_with(AUTO, -80, Some(&bmp)), "140078");
    }

    #[test]
    fn dominant_color_prefers_the_majority() {
        let mut rgba = Vec::new();
        for i in 0..100 {
            let px = if i % 4 == 0 { [0, 0, 255, 255] } else { [255, 0, 0, 255] };
            rgba.extend_from_slice(&px);
        }
        let bmp = Bitmap::new(10, 10, rgba).unwrap();
        // every 10th pixel: indices 0,10,..,90 -> 0,20,40,60,80 are blue (5 of 10)
        // and 10,30,50,70,90 are red; ties go to the lower bucket (blue).
        assert_eq!(dominant_color(&bmp).unwrap(), (0, 0, 255));
    }

    #[test]
    fn transparent_images_fail() {
        let bmp = Bitmap::solid(8, 8, [255, 0, 0, 0]);
        assert!(dominant_color(&bmp).is_err());
        assert_eq!(resolve_with(AUTO, 0, Some(&bmp)), FALLBACK_ACCENT);
    }

    #[test]
    fn white_only_images_still_resolve() {
        let bmp = Bitmap::solid(8, 8, [255, 255, 255, 255]);
        assert_eq!(dominant_color(&bmp).unwrap(), (255, 255, 255));
    }

    #[test]
    fn brightness_clamps() {
        assert_eq!(adjust_brightness((250, 5, 128), 10), (255, 15, 138));
        assert_eq!(adjust_brightness((250, 5, 128), -10), (240, 0, 118));
        assert_eq!(adjust_brightness((1, 2, 3), i32::MAX), (255, 255, 255));
    }
}
