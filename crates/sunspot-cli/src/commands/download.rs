use anyhow::{Context, Result};
use clap::Args;
use sunspot_core::acquisition::{download_series, AcquisitionRequest, HttpArchive};

use crate::progress::BarReporter;
use crate::settings::GlobalArgs;

#[derive(Args)]
pub struct DownloadArgs {
    /// Start of the range, "YYYY-MM-DD HH:MM:SS"
    #[arg(long)]
    pub start: String,

    /// End of the range, "YYYY-MM-DD HH:MM:SS"
    #[arg(long)]
    pub end: String,

    /// Instrument (hmi, aia, mdi, eit, gong); defaults to the configured one
    #[arg(long)]
    pub instrument: Option<String>,

    /// Hours between samples
    #[arg(long, default_value = "1")]
    pub sample: u32,
}

pub fn run(args: &DownloadArgs, global: &GlobalArgs) -> Result<()> {
    let config = global.load_config()?;
    let instrument = args
        .instrument
        .clone()
        .unwrap_or_else(|| config.acquisition.default_instrument.to_string());

    // Validate the request before touching the archive.
    let request = AcquisitionRequest::parse(&args.start, &args.end, &instrument, args.sample)?;
    let archive = HttpArchive::from_config(&config.acquisition)?;

    println!(
        "Downloading {} images from {} to {} every {} h",
        request.instrument, request.start, request.end, request.sample_hours
    );

    let reporter = BarReporter::new();
    let (series, paths) = download_series(&config.data_root, &request, &archive, &reporter)
        .context("Download failed")?;

    println!(
        "\nSeries {} saved to {} ({} files)",
        series.index(),
        series.dir().display(),
        paths.len()
    );
    Ok(())
}
