//! Oxide Draw - renders an animated demo scene to a PNG.

mod demo;
mod shapes;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use canvas::{CanvasContext2D, Surface};
use clap::Parser;
use common::Color;
use compositor::{Compositor, CompositorSettings, SolidBackground};
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Oxide Draw - a retained-mode 2D compositor demo
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Surface width
    #[arg(long, default_value = "320")]
    width: u32,

    /// Surface height
    #[arg(long, default_value = "240")]
    height: u32,

    /// Number of frames to render
    #[arg(long, default_value = "1")]
    frames: u32,

    /// Clear the surface before every frame (overrides the config file)
    #[arg(long)]
    clear_each_frame: Option<bool>,

    /// JSON file with compositor settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the last frame to this PNG file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Background color, hex or CSS name
    #[arg(long, default_value = "white")]
    background: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_str().to_lowercase()));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Oxide Draw v{}", env!("CARGO_PKG_VERSION"));

    let settings = settings_from(&args)?;
    let background = Color::parse(&args.background)
        .with_context(|| format!("invalid background color: {}", args.background))?;

    let surface = CanvasContext2D::new(args.width, args.height);
    let mut compositor =
        Compositor::new(surface, settings).with_background(SolidBackground::new(background));
    demo::build(&mut compositor).context("failed to build demo scene")?;

    for frame in 0..args.frames {
        let stats = compositor.redraw(frame == 0).stats();
        info!(
            frame,
            drawn = stats.drawn,
            skipped = stats.skipped,
            failed = stats.failed,
            cleared = stats.cleared,
            "frame rendered"
        );
    }

    if let Some(path) = &args.output {
        write_png(compositor.into_surface(), path)?;
        info!("Frame saved to: {}", path.display());
    }

    Ok(())
}

/// Settings from the config file, if any, with CLI overrides applied.
fn settings_from(args: &Args) -> Result<CompositorSettings> {
    let mut settings = match &args.config {
        Some(path) => load_settings(path)?,
        None => CompositorSettings::default(),
    };

    if let Some(clear) = args.clear_each_frame {
        settings.clear_each_frame = clear;
    }

    Ok(settings)
}

fn load_settings(path: &Path) -> Result<CompositorSettings> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn write_png(surface: CanvasContext2D, path: &Path) -> Result<()> {
    let (width, height) = (surface.width(), surface.height());
    let image = image::RgbaImage::from_raw(width, height, surface.into_data())
        .context("surface buffer does not match its size")?;
    image
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("failed to write {}", path.display()))
}
