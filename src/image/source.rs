//! Resolves thumbnail references (local paths, data URIs, remote URLs) to
//! decoded bitmaps.
//!
//! [`ThumbnailLoader::load`] never fails: any problem with the requested
//! source is logged and the fallback avatar is used instead.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::image::Bitmap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use percent_encoding::percent_decode_str;
use regex::Regex;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::StatusCode;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, warn};

static DATA_URI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^data:image/[a-z0-9.+-]+").expect("data uri pattern"));
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://").expect("url pattern"));
static IMAGE_EXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(png|jpe?g|gif|webp|bmp|svg)(\?.*)?$").expect("extension pattern")
});

/// Classified thumbnail reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailSource {
    Missing,
    DataUri(String),
    Url(String),
    Local(PathBuf),
    Unsupported(String),
}

impl ThumbnailSource {
    pub fn classify(source: Option<&str>) -> Self {
        let Some(source) = source.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::Missing;
        };
        if DATA_URI_RE.is_match(source) {
            Self::DataUri(source.to_string())
        } else if URL_RE.is_match(source) {
            Self::Url(source.to_string())
        } else if Path::new(source).exists() || IMAGE_EXT_RE.is_match(source) {
            Self::Local(PathBuf::from(source))
        } else {
            Self::Unsupported(source.to_string())
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ThumbnailOrigin {
    Requested,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub bitmap: Bitmap,
    pub origin: ThumbnailOrigin,
}

impl Thumbnail {
    pub fn is_fallback(&self) -> bool {
        self.origin == ThumbnailOrigin::Fallback
    }

    /// The bitmap, only if it came from the requested source.
    pub fn requested(&self) -> Option<&Bitmap> {
        (!self.is_fallback()).then_some(&self.bitmap)
    }
}

#[derive(Debug, Clone)]
pub struct ThumbnailLoader {
    client: reqwest::Client,
    avatar: PathBuf,
}

impl ThumbnailLoader {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static(
                "image/avif,image/webp,image/apng,image/svg+xml,image/*,*/*;q=0.8",
            ),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.9"),
        );
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        let client = reqwest::Client::builder()
            .user_agent(config.fetch.user_agent.as_str())
            .default_headers(headers)
            .timeout(config.fetch.timeout())
            .build()
            .map_err(|e| Error::fetch("http client", e))?;
        Ok(Self {
            client,
            avatar: config.avatar_path(),
        })
    }

    pub fn avatar(&self) -> &Path {
        &self.avatar
    }

    /// Loads `source`, falling back to the avatar on any failure.
    pub async fn load(&self, source: Option<&str>) -> Thumbnail {
        let source = ThumbnailSource::classify(source);
        match self.fetch(&source).await {
            Ok(bitmap) => Thumbnail {
                bitmap,
                origin: ThumbnailOrigin::Requested,
            },
            Err(e) => {
                if source != ThumbnailSource::Missing {
                    warn!(source = ?source, error = %e, "thumbnail unavailable, using fallback avatar");
                }
                Thumbnail {
                    bitmap: self.fallback(),
                    origin: ThumbnailOrigin::Fallback,
                }
            }
        }
    }

    /// Loads `source` without any fallback.
    pub async fn fetch(&self, source: &ThumbnailSource) -> Result<Bitmap> {
        match source {
            ThumbnailSource::Missing => Err(Error::Decode(String::from("no thumbnail given"))),
            ThumbnailSource::Unsupported(s) => {
                Err(Error::Decode(format!("unsupported thumbnail reference `{s}`")))
            }
            ThumbnailSource::DataUri(uri) => Bitmap::decode(&decode_data_uri(uri)?),
            ThumbnailSource::Local(path) => Bitmap::open(path),
            ThumbnailSource::Url(url) => {
                let body = self.download(url).await?;
                Bitmap::decode(&body).map_err(|e| Error::fetch(url, e))
            }
        }
    }

    /// Single GET attempt; only a 200 response with an `image/*` body is accepted.
    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        debug!(url, "fetching thumbnail");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::fetch(url, e))?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::fetch(url, format!("unexpected status {status}")));
        }
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();
        if !content_type.starts_with("image/") {
            return Err(Error::fetch(
                url,
                format!("unexpected content type `{content_type}`"),
            ));
        }
        let body = response.bytes().await.map_err(|e| Error::fetch(url, e))?;
        if body.is_empty() {
            return Err(Error::fetch(url, "empty body"));
        }
        Ok(body.to_vec())
    }

    /// The avatar bitmap, or a generated placeholder when the avatar itself
    /// can't be decoded.
    pub fn fallback(&self) -> Bitmap {
        Bitmap::open(&self.avatar).unwrap_or_else(|e| {
            warn!(error = %e, "fallback avatar unavailable, using placeholder");
            Bitmap::placeholder()
        })
    }
}

/// Extracts the payload of a `data:` URI, base64-decoding it when flagged and
/// percent-decoding it otherwise.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let (meta, payload) = uri
        .split_once(',')
        .ok_or_else(|| Error::Decode(String::from("data URI has no payload")))?;
    if meta.to_ascii_lowercase().ends_with(";base64") {
        STANDARD
            .decode(payload.trim())
            .map_err(|e| Error::Decode(e.to_string()))
    } else {
        Ok(percent_decode_str(payload).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_references() {
        use ThumbnailSource::*;
        assert_eq!(ThumbnailSource::classify(None), Missing);
        assert_eq!(ThumbnailSource::classify(Some("  ")), Missing);
        assert!(matches!(
            ThumbnailSource::classify(Some("data:image/png;base64,AAAA")),
            DataUri(_)
        ));
        assert!(matches!(
            ThumbnailSource::classify(Some("https://i.scdn.co/image/ab67616d")),
            Url(_)
        ));
        assert!(matches!(
            ThumbnailSource::classify(Some("HTTP://example.com/a.PNG?x=1")),
            Url(_)
        ));
        assert_eq!(
            ThumbnailSource::classify(Some("covers/missing.jpg?size=large")),
            Local(PathBuf::from("covers/missing.jpg?size=large"))
        );
        assert!(matches!(
            ThumbnailSource::classify(Some("not a thumbnail")),
            Unsupported(_)
        ));
        assert!(matches!(
            ThumbnailSource::classify(Some("data:text/plain,hello")),
            Unsupported(_)
        ));
    }

    #[test]
    fn existing_paths_without_extension_are_local() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover");
        std::fs::write(&path, b"x").unwrap();
        let s = path.to_string_lossy().to_string();
        assert_eq!(ThumbnailSource::classify(Some(&s)), ThumbnailSource::Local(path));
    }

    #[test]
    fn decodes_data_uri_payloads() {
        assert_eq!(
            decode_data_uri("data:image/png;base64,aGVsbG8=").unwrap(),
            b"hello"
        );
        assert_eq!(
            decode_data_uri("data:image/svg+xml,<svg/>").unwrap(),
            b"<svg/>"
        );
        assert_eq!(
            decode_data_uri("data:image/svg+xml,%3Csvg%20width%3D%221%22%2F%3E").unwrap(),
            br#"<svg width="1"/>"#
        );
        assert!(decode_data_uri("data:image/png;base64").is_err());
        assert!(decode_data_uri("data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn loader_falls_back_to_the_configured_avatar() {
        let config = Config::default().with_images("assets");
        let loader = ThumbnailLoader::new(&config).unwrap();
        assert_eq!(loader.avatar(), Path::new("assets").join("avatar.png"));

        let config = config.with_avatar("elsewhere/me.png");
        let loader = ThumbnailLoader::new(&config).unwrap();
        assert_eq!(loader.avatar(), Path::new("elsewhere/me.png"));
        // neither file exists, so the placeholder stands in
        assert_eq!(loader.fallback(), Bitmap::placeholder());
    }
}
