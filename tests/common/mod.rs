#![allow(dead_code)]

use cairo::{Context, Format, ImageSurface, LinearGradient};
use std::fs::{self, File};
use std::path::Path;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use zkcard::Config;

/// A temporary images tree with one background per theme and an avatar.
pub struct Fixture {
    pub dir: TempDir,
    pub config: Config,
}

impl Fixture {
    pub fn new(themes: &[&str]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join("images");
        fs::create_dir_all(&images).unwrap();
        for (i, theme) in themes.iter().enumerate() {
            let folder = images.join(theme);
            fs::create_dir_all(&folder).unwrap();
            let shade = (i * 37 % 200) as f64 / 255.0;
            write_png(&folder.join("1.png"), 64, 32, (shade, 0.2, 0.4));
            write_png(&folder.join("2.png"), 64, 32, (0.1, shade, 0.3));
        }
        write_png(&images.join("avatar.png"), 32, 32, (0.5, 0.5, 0.5));

        let mut config = Config::default().with_images(&images);
        config.fonts.clear();
        Self { dir, config }
    }

    pub fn images(&self) -> &Path {
        &self.config.images
    }

    pub fn avatar(&self) -> std::path::PathBuf {
        self.config.avatar_path()
    }
}

pub fn png_bytes(width: i32, height: i32, (r, g, b): (f64, f64, f64)) -> Vec<u8> {
    let surface = ImageSurface::create(Format::ARgb32, width, height).unwrap();
    {
        let cr = Context::new(&surface).unwrap();
        cr.set_source_rgb(r, g, b);
        cr.paint().unwrap();
    }
    let mut buffer = Vec::new();
    surface.write_to_png(&mut buffer).unwrap();
    buffer
}

/// A diagonal gradient, so the pixel data doesn't compress to a few bytes.
pub fn gradient_png_bytes(width: i32, height: i32) -> Vec<u8> {
    let surface = ImageSurface::create(Format::ARgb32, width, height).unwrap();
    {
        let cr = Context::new(&surface).unwrap();
        let gradient = LinearGradient::new(0.0, 0.0, width as f64, height as f64);
        gradient.add_color_stop_rgb(0.0, 0.9, 0.1, 0.3);
        gradient.add_color_stop_rgb(0.5, 0.1, 0.8, 0.2);
        gradient.add_color_stop_rgb(1.0, 0.2, 0.3, 0.9);
        cr.set_source(&gradient).unwrap();
        cr.paint().unwrap();
    }
    let mut buffer = Vec::new();
    surface.write_to_png(&mut buffer).unwrap();
    buffer
}

pub fn write_png(path: &Path, width: i32, height: i32, rgb: (f64, f64, f64)) {
    let surface = ImageSurface::create(Format::ARgb32, width, height).unwrap();
    {
        let cr = Context::new(&surface).unwrap();
        let (r, g, b) = rgb;
        cr.set_source_rgb(r, g, b);
        cr.paint().unwrap();
    }
    let mut file = File::create(path).unwrap();
    surface.write_to_png(&mut file).unwrap();
}

pub fn dimensions(png_data: &[u8]) -> (u32, u32) {
    let reader = png::Decoder::new(png_data).read_info().unwrap();
    let info = reader.info();
    (info.width, info.height)
}

/// Serves `body` with `content_type` to every connection, returning the URL.
pub async fn serve(content_type: &'static str, body: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let body = body.clone();
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let head = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(&body).await;
                let _ = socket.shutdown().await;
            });
        }
    });
    format!("http://{addr}/cover.png")
}
