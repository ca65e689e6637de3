//! # zkcard
//!
//! Renders "now playing" music cards: a themed background, the track
//! thumbnail and the track name, author and requester, encoded as PNG.
//!
//! ```no_run
//! # async fn run() -> zkcard::Result<()> {
//! let png = zkcard::CardSpec::new()
//!     .with_name("Ash Again")
//!     .with_author("Gawr Gura")
//!     .with_requester("ZenKho")
//!     .with_color("auto")
//!     .with_theme("themes4")
//!     .with_brightness(50)
//!     .build()
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod accent;
pub mod card;
pub mod catalog;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod image;
pub mod layer;
pub mod text;
pub mod theme;

pub use card::{CardRenderer, CardSpec};
pub use catalog::AssetCatalog;
pub use config::Config;
pub use error::{Error, Result};

/// Starts the image backend and registers the configured fonts. Only the
/// first call does any work.
pub fn setup(config: &Config) -> Result<()> {
    image::init()?;
    text::register(&config.fonts);
    Ok(())
}

/// Names of every theme folder holding at least one background image.
pub fn available_themes(config: &Config) -> Vec<String> {
    AssetCatalog::new(&config.images).list_themes()
}
