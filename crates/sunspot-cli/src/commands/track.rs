use std::path::PathBuf;
use std::process::Command;

use anyhow::{bail, Context, Result};
use clap::Args;
use sunspot_core::series::Series;
use sunspot_core::tracking::{run_tracking, HeadlessReviewer};
use tracing::warn;

use crate::progress::BarReporter;
use crate::settings::GlobalArgs;
use crate::summary::print_tracking_summary;

#[derive(Args)]
pub struct TrackArgs {
    /// Series number (the XX of TR_XX)
    #[arg(long)]
    pub series: u32,

    /// Run without the review window; nothing is written to the table
    #[arg(long)]
    pub no_interactive: bool,

    /// Save overlay frames as PNG here (with --no-interactive)
    #[arg(long)]
    pub render_dir: Option<PathBuf>,
}

pub fn run(args: &TrackArgs, global: &GlobalArgs) -> Result<()> {
    if !args.no_interactive {
        if args.render_dir.is_some() {
            warn!("--render-dir is ignored in interactive mode");
        }
        return launch_review_window(args, global);
    }

    let config = global.load_config()?;
    let series = Series::open(&config.data_root, args.series);
    let mut reviewer = HeadlessReviewer::new(args.render_dir.clone());
    let reporter = BarReporter::new();

    let summary = run_tracking(&series, &config, &mut reviewer, &reporter)
        .with_context(|| format!("Tracking failed for {}", series.dir().display()))?;

    print_tracking_summary(&series, &summary);
    if let Some(ref dir) = args.render_dir {
        println!("  {} overlay frames written to {}", reviewer.rendered(), dir.display());
    }
    Ok(())
}

/// Run the session inside the review window binary installed next to this one.
fn launch_review_window(args: &TrackArgs, global: &GlobalArgs) -> Result<()> {
    let exe = std::env::current_exe().context("Cannot locate the sunspot executable")?;
    let gui = exe.with_file_name(format!("sunspot-gui{}", std::env::consts::EXE_SUFFIX));

    let mut command = Command::new(&gui);
    command.arg("--series").arg(args.series.to_string());
    if let Some(ref path) = global.config {
        command.arg("--config").arg(path);
    }
    if let Some(ref root) = global.data_root {
        command.arg("--data-root").arg(root);
    }

    let status = command
        .status()
        .with_context(|| format!("Failed to launch review window {}", gui.display()))?;
    if !status.success() {
        bail!("Review window exited with {status}");
    }
    Ok(())
}
