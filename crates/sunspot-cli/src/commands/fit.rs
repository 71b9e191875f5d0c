use anyhow::{Context, Result};
use clap::Args;
use sunspot_core::rotation::{analyze_series, fit_samples};
use sunspot_core::series::Series;

use crate::settings::GlobalArgs;
use crate::summary::print_fit_summary;

#[derive(Args)]
pub struct FitArgs {
    /// Series numbers whose measurements are pooled
    #[arg(long, num_args = 1.., required = true)]
    pub series: Vec<u32>,
}

pub fn run(args: &FitArgs, global: &GlobalArgs) -> Result<()> {
    let config = global.load_config()?;

    let mut samples = Vec::new();
    for &index in &args.series {
        let series = Series::open(&config.data_root, index);
        let found = analyze_series(&series, config.fits.data_hdu, config.analysis.cadence_hours)
            .with_context(|| format!("Failed to analyze {}", series.dir().display()))?;
        println!("Series {index}: {} measurements", found.len());
        samples.extend(found);
    }

    let fit = fit_samples(&samples).context("Rotation fit failed")?;
    print_fit_summary(&samples, &fit);
    Ok(())
}
