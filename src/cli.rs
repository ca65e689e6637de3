//! CLI implementation.

use crate::card::{CardRenderer, CardSpec};
use crate::config::Config;
use crate::error::Result;

use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Render "now playing" music card images
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render one card to a PNG file
    Render(RenderArgs),
    /// List the themes that have background images
    Themes,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Track name
    #[arg(short, long)]
    pub name: String,

    /// Track author
    #[arg(short, long)]
    pub author: String,

    /// Who requested the track
    #[arg(short, long)]
    pub requester: String,

    /// Accent color, a hex value or "auto"
    #[arg(long)]
    pub color: Option<String>,

    /// Theme name
    #[arg(short, long)]
    pub theme: Option<String>,

    /// Brightness shift applied to "auto" colors
    #[arg(short, long, allow_hyphen_values = true)]
    pub brightness: Option<i32>,

    /// Thumbnail path, data URI or URL
    #[arg(long)]
    pub thumbnail: Option<String>,

    /// Seed for background and palette choices
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output image path
    #[arg(short, long)]
    pub output: PathBuf,
}

macro_rules! error {
    ($res:expr) => {
        $res.unwrap_or_else(|e| panic!("{e}"))
    };
}

impl Cli {
    pub async fn run() {
        std::panic::set_hook(Box::new(|panic_info| {
            if let Some(s) = panic_info.payload().downcast_ref::<String>() {
                eprintln!("{s}");
            } else {
                eprintln!("{panic_info}");
            }
        }));
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(std::io::stderr)
            .init();

        let cli = Self::parse();
        let config = error!(cli.load_config());
        match cli.command {
            Command::Render(args) => error!(render(config, args).await),
            Command::Themes => {
                for theme in crate::available_themes(&config) {
                    println!("{theme}");
                }
            }
        }
    }

    fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::open(path),
            None => Ok(Config::default()),
        }
    }
}

async fn render(config: Config, args: RenderArgs) -> Result<()> {
    let renderer = CardRenderer::new(config)?;
    let mut spec = CardSpec::new()
        .with_name(args.name)
        .with_author(args.author)
        .with_requester(args.requester);
    spec.color = args.color;
    spec.theme = args.theme;
    spec.brightness = args.brightness;
    spec.thumbnail = args.thumbnail;

    let png = match args.seed {
        Some(seed) => {
            use rand::SeedableRng;
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
            renderer.render_with_rng(&spec, &mut rng).await?
        }
        None => renderer.render(&spec).await?,
    };
    fs::write(&args.output, png)?;
    eprintln!("wrote {}", args.output.display());
    Ok(())
}
