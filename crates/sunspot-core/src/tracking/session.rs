use tracing::{info, warn};

use crate::config::SunspotConfig;
use crate::detection::{detect_spots, strategy_for, GroupedSpot};
use crate::error::{Result, SunspotError};
use crate::frame::Frame;
use crate::geometry::CalibrationGeometry;
use crate::progress::{ProgressReporter, Stage};
use crate::series::Series;
use crate::store::{DisplacementRecord, DisplacementStore};

use super::engine::{SpotTrack, StepResult, TrackOutcome};
use super::review::{Decision, FrameView, ReviewControl, ReviewScope, Reviewer};
use super::state::TrackPhase;
use super::tracker::{build_tracker, SingleObjectTracker, TrackingConfig};

/// What happened during one tracking run.
#[derive(Clone, Debug, Default)]
pub struct SessionSummary {
    /// Spots detected on the first frame.
    pub spots: usize,
    /// One entry per spot that was started, in detection order.
    pub outcomes: Vec<TrackOutcome>,
    /// Records appended to the displacement table.
    pub persisted: Vec<DisplacementRecord>,
    /// The operator cancelled; remaining spots were not tracked.
    pub cancelled: bool,
}

impl SessionSummary {
    pub fn count(&self, phase: TrackPhase) -> usize {
        self.outcomes.iter().filter(|o| o.phase == phase).count()
    }
}

/// Track every spot across `frames`, presenting each frame to `reviewer` and
/// appending accepted measurements to `store`.
///
/// `frames` must share one shape and start with the frame the spots were
/// detected on. The reviewer is closed before this returns.
#[allow(clippy::too_many_arguments)]
pub fn track_spots<R, F>(
    frames: &[Frame],
    geometry: &CalibrationGeometry,
    spots: &[GroupedSpot],
    config: &TrackingConfig,
    make_tracker: F,
    reviewer: &mut R,
    store: &DisplacementStore,
    progress: &dyn ProgressReporter,
) -> Result<SessionSummary>
where
    R: Reviewer + ?Sized,
    F: FnMut() -> Box<dyn SingleObjectTracker>,
{
    let mut scope = ReviewScope::new(reviewer);
    track_all(
        frames,
        geometry,
        spots,
        config,
        make_tracker,
        &mut *scope,
        store,
        progress,
    )
}

/// Load a series, detect spots on its first frame and track them.
pub fn run_tracking<R>(
    series: &Series,
    config: &SunspotConfig,
    reviewer: &mut R,
    progress: &dyn ProgressReporter,
) -> Result<SessionSummary>
where
    R: Reviewer + ?Sized,
{
    let mut scope = ReviewScope::new(reviewer);
    let hdu = config.fits.data_hdu;

    let geometry = series.geometry(hdu)?;
    let frames = series.load_frames(hdu, progress)?;
    info!(
        series = series.index(),
        frames = frames.len(),
        radius = geometry.disk_radius_px,
        "Loaded series"
    );

    progress.begin_stage(Stage::Detecting, Some(1));
    let strategy = strategy_for(config.detection.clustering);
    let detection = detect_spots(&frames[0], &geometry, &config.detection, strategy.as_ref());
    progress.advance(1);
    progress.finish_stage();

    track_all(
        &frames,
        &geometry,
        &detection.spots,
        &config.tracking,
        || build_tracker(&config.tracking),
        &mut *scope,
        &series.store(),
        progress,
    )
}

#[allow(clippy::too_many_arguments)]
fn track_all<R, F>(
    frames: &[Frame],
    geometry: &CalibrationGeometry,
    spots: &[GroupedSpot],
    config: &TrackingConfig,
    mut make_tracker: F,
    reviewer: &mut R,
    store: &DisplacementStore,
    progress: &dyn ProgressReporter,
) -> Result<SessionSummary>
where
    R: Reviewer + ?Sized,
    F: FnMut() -> Box<dyn SingleObjectTracker>,
{
    let Some(first) = frames.first() else {
        return Err(SunspotError::EmptyResult("No frames to track".into()));
    };
    let interactive = reviewer.is_interactive();
    let mut summary = SessionSummary {
        spots: spots.len(),
        ..Default::default()
    };

    progress.begin_stage(Stage::Tracking, Some(spots.len()));

    'spots: for (spot_index, spot) in spots.iter().enumerate() {
        let mut track =
            SpotTrack::start(make_tracker(), first, spot, config.oversize, frames.len())?;
        let mut last = StepResult {
            frame_index: 0,
            success: false,
            bbox: track.state().current_box,
            center: None,
        };

        for frame in &frames[1..] {
            last = track.step(frame);
            let view = FrameView {
                frame,
                geometry,
                spot_index,
                spot_count: spots.len(),
                frame_count: frames.len(),
                start: spot.centroid,
                step: last,
            };

            let mut control = reviewer.present(&view);
            if control == ReviewControl::Pause {
                control = reviewer.wait_for_resume();
            }
            if control == ReviewControl::Cancel {
                summary.outcomes.push(track.abandon());
                summary.cancelled = true;
                info!(
                    spot = spot_index + 1,
                    frame = last.frame_index,
                    "Tracking cancelled by operator"
                );
                break 'spots;
            }
        }

        let outcome = track.finish();
        info!(
            spot = spot_index + 1,
            phase = %outcome.phase,
            "Spot track finished"
        );

        if interactive {
            let view = FrameView {
                frame: &frames[frames.len() - 1],
                geometry,
                spot_index,
                spot_count: spots.len(),
                frame_count: frames.len(),
                start: spot.centroid,
                step: last,
            };
            match (reviewer.decide(&view, &outcome), outcome.record()) {
                (Decision::Accept, Some(record)) => {
                    store.append(&[record])?;
                    summary.persisted.push(record);
                }
                (Decision::Accept, None) => {
                    warn!(
                        spot = spot_index + 1,
                        "Track has no end point on the last frame, measurement discarded"
                    );
                }
                (Decision::Reject, _) => {}
            }
        }

        summary.outcomes.push(outcome);
        progress.advance(spot_index + 1);
    }

    progress.finish_stage();
    Ok(summary)
}
