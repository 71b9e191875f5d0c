use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use sunspot_core::detection::{detect_spots, strategy_for};
use sunspot_core::geometry::extract_geometry;
use sunspot_core::normalize::load_normalized;

use crate::settings::GlobalArgs;
use crate::summary::print_detection_summary;

#[derive(Args)]
pub struct DetectArgs {
    /// Input FITS file
    pub file: PathBuf,
}

pub fn run(args: &DetectArgs, global: &GlobalArgs) -> Result<()> {
    let config = global.load_config()?;
    let hdu = config.fits.data_hdu;

    let geometry = extract_geometry(&args.file, hdu)
        .with_context(|| format!("No calibration geometry in {}", args.file.display()))?;
    let frame = load_normalized(&args.file, hdu, 0)?;

    let strategy = strategy_for(config.detection.clustering);
    let detection = detect_spots(&frame, &geometry, &config.detection, strategy.as_ref());

    print_detection_summary(&args.file, strategy.name(), &detection);
    Ok(())
}
