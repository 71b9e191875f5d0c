mod commands;
mod progress;
mod settings;
mod summary;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sunspot", about = "Sunspot tracking and solar rotation tool")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the TR_XX series (overrides the config)
    #[arg(long, global = true)]
    data_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download a new image series from the archive
    Download(commands::download::DownloadArgs),
    /// Detect and track sunspots through a series
    Track(commands::track::TrackArgs),
    /// Show calibration geometry of an image and save a preview
    View(commands::view::ViewArgs),
    /// List the sunspots detected on one image
    Detect(commands::detect::DetectArgs),
    /// Fit the differential rotation law to stored measurements
    Fit(commands::fit::FitArgs),
    /// Print or save the default configuration
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let global = settings::GlobalArgs {
        config: cli.config,
        data_root: cli.data_root,
    };

    match &cli.command {
        Commands::Download(args) => commands::download::run(args, &global),
        Commands::Track(args) => commands::track::run(args, &global),
        Commands::View(args) => commands::view::run(args, &global),
        Commands::Detect(args) => commands::detect::run(args, &global),
        Commands::Fit(args) => commands::fit::run(args, &global),
        Commands::Config(args) => commands::config::run(args),
    }
}
