//! Image backend: decoding through libvips, compositing through cairo.

mod color;
pub mod shape;
pub mod source;

pub use crate::image::color::Color;
pub use crate::image::shape::Shape;
pub use crate::image::source::{Thumbnail, ThumbnailLoader, ThumbnailOrigin, ThumbnailSource};

use crate::error::{Error, Result};

use cairo::{Format, ImageSurface};
use libvips::{ops, VipsApp, VipsImage};
use std::path::Path;
use std::sync::OnceLock;

static VIPS: OnceLock<std::result::Result<VipsApp, String>> = OnceLock::new();

/// Starts libvips once for the whole process.
pub fn init() -> Result<&'static VipsApp> {
    VIPS.get_or_init(|| VipsApp::default("zkcard").map_err(|e| e.to_string()))
        .as_ref()
        .map_err(|e| Error::VipsError(e.clone()))
}

fn err(e: libvips::error::Error) -> Error {
    let detail = VIPS
        .get()
        .and_then(|app| app.as_ref().ok())
        .and_then(|app| app.error_buffer().ok())
        .unwrap_or_default();
    Error::VipsError(format!("{e} {detail}").trim_end().to_string())
}

/// An owned, decoded 8-bit RGBA image (straight alpha, row-major).
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Bitmap {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::Decode(String::from("image has no pixels")));
        }
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(Error::Decode(format!(
                "expected {expected} bytes of RGBA data, got {}",
                rgba.len()
            )));
        }
        Ok(Self { width, height, rgba })
    }

    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        let rgba = color.repeat(width.max(1) as usize * height.max(1) as usize);
        Self {
            width: width.max(1),
            height: height.max(1),
            rgba,
        }
    }

    /// Neutral grey square used when even the fallback avatar is unusable.
    pub fn placeholder() -> Self {
        Self::solid(256, 256, [0x80, 0x80, 0x80, 0xff])
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.rgba.chunks_exact(4).map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Offset and side length of the largest centered square.
    pub fn square_crop(&self) -> (f64, f64, f64) {
        let (w, h) = (self.width as f64, self.height as f64);
        let size = w.min(h);
        ((w - size) / 2.0, (h - size) / 2.0, size)
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        init()?;
        let fp = path.to_string_lossy();
        let img = VipsImage::new_from_file(&fp).map_err(|e| Error::open_image(path, err(e)))?;
        Self::from_vips(img).map_err(|e| Error::open_image(path, e))
    }

    pub fn decode(buffer: &[u8]) -> Result<Self> {
        if buffer.is_empty() {
            return Err(Error::Decode(String::from("empty buffer")));
        }
        init()?;
        let img = VipsImage::new_from_buffer(buffer, "").map_err(err)?;
        Self::from_vips(img)
    }

    fn from_vips(img: VipsImage) -> Result<Self> {
        let img = ops::colourspace(&img, ops::Interpretation::Srgb).map_err(err)?;
        let img = ops::cast(&img, ops::BandFormat::Uchar).map_err(err)?;
        let img = match img.get_bands() {
            3 => ops::bandjoin_const(&img, &mut [255.0]).map_err(err)?,
            4 => img,
            n => return Err(Error::Decode(format!("unsupported band count {n}"))),
        };
        // decoding is lazy; materialize here so corrupt pixel data surfaces as an error
        let img = VipsImage::image_copy_memory(img).map_err(err)?;
        let (w, h) = (img.get_width(), img.get_height());
        if w <= 0 || h <= 0 {
            return Err(Error::Decode(String::from("image has no pixels")));
        }
        Self::new(w as u32, h as u32, img.image_write_to_memory())
    }

    /// Copies the pixels into a premultiplied ARGB32 cairo surface.
    pub fn to_surface(&self) -> Result<ImageSurface> {
        let mut surface = ImageSurface::create(Format::ARgb32, self.width as i32, self.height as i32)?;
        let stride = surface.stride() as usize;
        let row_len = self.width as usize * 4;
        {
            let mut data = surface
                .data()
                .map_err(|e| Error::CairoError(e.to_string()))?;
            for (y, row) in self.rgba.chunks_exact(row_len).enumerate() {
                for (x, p) in row.chunks_exact(4).enumerate() {
                    let a = p[3] as u32;
                    let pm = |c: u8| (c as u32 * a + 127) / 255;
                    let argb = a << 24 | pm(p[0]) << 16 | pm(p[1]) << 8 | pm(p[2]);
                    let at = y * stride + x * 4;
                    data[at..at + 4].copy_from_slice(&argb.to_ne_bytes());
                }
            }
        }
        Ok(surface)
    }
}

pub fn new_canvas(width: i32, height: i32) -> Result<ImageSurface> {
    Ok(ImageSurface::create(Format::ARgb32, width, height)?)
}

pub fn encode_png(surface: &ImageSurface) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    surface
        .write_to_png(&mut buffer)
        .map_err(|e| Error::CairoError(e.to_string()))?;
    Ok(buffer)
}

/// Paints `src` stretched over the rectangle `(x, y, w, h)`.
pub fn paint_scaled(
    cr: &cairo::Context,
    src: &ImageSurface,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
) -> Result<()> {
    let (sw, sh) = (src.width() as f64, src.height() as f64);
    cr.save()?;
    cr.translate(x, y);
    cr.scale(w / sw, h / sh);
    cr.set_source_surface(src, 0.0, 0.0)?;
    cr.paint()?;
    cr.restore()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_buffers() {
        assert!(Bitmap::new(2, 2, vec![0; 15]).is_err());
        assert!(Bitmap::new(0, 2, vec![]).is_err());
        assert!(Bitmap::new(2, 2, vec![0; 16]).is_ok());
    }

    #[test]
    fn square_crop_is_centered() {
        let wide = Bitmap::solid(300, 100, [0, 0, 0, 255]);
        assert_eq!(wide.square_crop(), (100.0, 0.0, 100.0));
        let tall = Bitmap::solid(50, 90, [0, 0, 0, 255]);
        assert_eq!(tall.square_crop(), (0.0, 20.0, 50.0));
    }

    #[test]
    fn surface_is_premultiplied() {
        let bmp = Bitmap::new(1, 1, vec![255, 0, 0, 128]).unwrap();
        let mut surface = bmp.to_surface().unwrap();
        let data = surface.data().unwrap();
        let px = u32::from_ne_bytes([data[0], data[1], data[2], data[3]]);
        assert_eq!(px >> 24, 128);
        assert_eq!((px >> 16) & 0xff, 128);
        assert_eq!(px & 0xffff, 0);
    }

    #[test]
    fn png_roundtrips_through_vips() {
        let bmp = Bitmap::solid(7, 3, [10, 20, 30, 255]);
        let png = encode_png(&bmp.to_surface().unwrap()).unwrap();
        let back = Bitmap::decode(&png).unwrap();
        assert_eq!((back.width(), back.height()), (7, 3));
        assert_eq!(back.pixels().next(), Some([10, 20, 30, 255]));
    }

    #[test]
    fn truncated_png_is_an_error_or_full_size() {
        let rgba: Vec<u8> = (0..64 * 64 * 4u32).map(|i| (i * 7 % 251) as u8 | 1).collect();
        let bmp = Bitmap::new(64, 64, rgba).unwrap();
        let png = encode_png(&bmp.to_surface().unwrap()).unwrap();
        match Bitmap::decode(&png[..png.len() / 2]) {
            Ok(back) => assert_eq!((back.width(), back.height()), (64, 64)),
            Err(e) => assert!(matches!(e, Error::VipsError(_)), "{e}"),
        }
    }
}
