use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use sunspot_core::frame::Frame;
use sunspot_core::geometry::geometry_from_hdu;
use sunspot_core::io::fits::FitsFile;
use sunspot_core::io::image_io::save_png;
use sunspot_core::normalize::normalize;
use sunspot_core::rotation::Observer;

use crate::settings::GlobalArgs;
use crate::summary::print_image_summary;

#[derive(Args)]
pub struct ViewArgs {
    /// Input FITS file
    pub file: PathBuf,

    /// Save the normalized image as PNG
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &ViewArgs, global: &GlobalArgs) -> Result<()> {
    let config = global.load_config()?;
    let hdu_index = config.fits.data_hdu;

    let mut fits = FitsFile::open(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    let hdu_count = fits.hdu_count();
    let mut hdu = fits.hdu(hdu_index)?;
    let geometry = geometry_from_hdu(&mut hdu)?;
    let observer = Observer::from_hdu(&mut hdu).ok();
    let frame = hdu
        .read_image()
        .map(|raw| Frame::new(normalize(&raw), 0))?;

    print_image_summary(&args.file, hdu_count, &frame, &geometry, observer.as_ref());

    if let Some(ref path) = args.output {
        save_png(&frame, path)
            .with_context(|| format!("Failed to save preview to {}", path.display()))?;
        println!("Preview saved to {}", path.display());
    }
    Ok(())
}
