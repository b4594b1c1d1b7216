use clap::Parser;
use std::path::PathBuf;
use tracing::{Level, error};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use datemark::{Config, Position, stamp};

/// Stamp the capture date onto photos
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Image file or directory path
    input_path: PathBuf,

    /// Font size in pixels, 1-2048 (default: 32)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=stamp::MAX_FONT_SIZE as i64))]
    font_size: Option<u32>,

    /// Text color, hex or name (default: #FFFFFF)
    #[arg(long)]
    color: Option<String>,

    /// Watermark position (default: bottom-right)
    #[arg(long, value_enum)]
    position: Option<Position>,

    /// Text opacity 0-255 (default: 220)
    #[arg(long)]
    opacity: Option<u8>,

    /// Optional path to a .ttf/.otf font file
    #[arg(long)]
    font_path: Option<PathBuf>,

    /// Distance from the image edges in pixels (default: 16)
    #[arg(long)]
    margin: Option<u32>,

    /// Don't draw the drop shadow under the text
    #[arg(long)]
    no_shadow: bool,

    /// JPEG output quality 1-100 (default: 92)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    jpeg_quality: Option<u8>,

    #[arg(short, long, default_value = "datemark.toml")]
    config: PathBuf,

    #[arg(short, long, default_value = "info")]
    log_level: String,
}

impl Cli {
    /// Command-line flags take precedence over the config file
    fn apply_to(&self, config: &mut Config) {
        if let Some(font_size) = self.font_size {
            config.watermark.font_size = font_size;
        }
        if let Some(color) = &self.color {
            config.watermark.color = color.clone();
        }
        if let Some(position) = self.position {
            config.watermark.position = position;
        }
        if let Some(opacity) = self.opacity {
            config.watermark.opacity = opacity;
        }
        if let Some(font_path) = &self.font_path {
            config.watermark.font_path = Some(font_path.clone());
        }
        if let Some(margin) = self.margin {
            config.watermark.margin = margin;
        }
        if self.no_shadow {
            config.watermark.shadow = false;
        }
        if let Some(quality) = self.jpeg_quality {
            config.output.jpeg_quality = quality;
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Set up logging first
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // RUST_LOG directives refine the --log-level default
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = Config::load(&cli.config)?;
    cli.apply_to(&mut config);

    // The summary is logged by the batch driver
    match stamp::run(&cli.input_path, &config) {
        Ok(_summary) => Ok(()),
        Err(e) => {
            error!("{}", e);
            Err(e.into())
        }
    }
}
