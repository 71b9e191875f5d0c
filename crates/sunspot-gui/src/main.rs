mod app;
mod convert;
mod messages;
mod panels;
mod progress;
mod reviewer;
mod worker;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sunspot_core::config::SunspotConfig;
use sunspot_core::series::Series;

/// Review window for a tracking run: shows every tracked frame and asks
/// whether each finished track should be saved.
#[derive(Parser)]
#[command(name = "sunspot-gui", version)]
struct Args {
    /// Series number (the XX of TR_XX)
    #[arg(long)]
    series: u32,

    /// Configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the TR_XX series (overrides the config)
    #[arg(long)]
    data_root: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<SunspotConfig> {
    let mut config = match args.config {
        Some(ref path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => SunspotConfig::default(),
    };
    if let Some(ref root) = args.data_root {
        config.data_root = root.clone();
    }
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let series = Series::open(&config.data_root, args.series);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 900.0])
            .with_min_inner_size([600.0, 500.0])
            .with_title(format!("Sunspot tracking - {}", series.dir().display())),
        ..Default::default()
    };

    eframe::run_native(
        "SunspotReview",
        options,
        Box::new(move |cc| Ok(Box::new(app::ReviewApp::new(&cc.egui_ctx, series, config)?))),
    )
    .map_err(|e| anyhow::anyhow!("Review window failed: {e}"))
}
