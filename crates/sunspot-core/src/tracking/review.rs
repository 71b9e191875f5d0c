use std::ops::{Deref, DerefMut};
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::frame::{Frame, Point};
use crate::geometry::CalibrationGeometry;
use crate::io::image_io::save_rgb_png;

use super::engine::{StepResult, TrackOutcome};
use super::overlay::render_overlay;

/// Operator input collected while a frame is shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReviewControl {
    Continue,
    Pause,
    /// Abandon every remaining spot of the run.
    Cancel,
}

/// Answer of the accept/reject gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Reject,
}

/// Everything needed to draw one tracked frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a> {
    pub frame: &'a Frame,
    pub geometry: &'a CalibrationGeometry,
    pub spot_index: usize,
    pub spot_count: usize,
    pub frame_count: usize,
    /// Start point of the displacement (spot centroid on the first frame).
    pub start: Point,
    pub step: StepResult,
}

/// Presentation and input side of a tracking run.
///
/// The session calls `present` once per tracked frame, `wait_for_resume`
/// after a pause, and `decide` once per finished spot when interactive.
/// Blocking calls have no timeout.
pub trait Reviewer {
    /// Only interactive reviewers can accept measurements.
    fn is_interactive(&self) -> bool;

    fn present(&mut self, view: &FrameView<'_>) -> ReviewControl;

    /// Block until the operator resumes. May return `Cancel`.
    fn wait_for_resume(&mut self) -> ReviewControl;

    /// Block until the operator accepts or rejects the finished track.
    fn decide(&mut self, view: &FrameView<'_>, outcome: &TrackOutcome) -> Decision;

    /// Release display resources.
    fn close(&mut self);
}

/// Calls `Reviewer::close` when dropped, on every exit path of a run.
pub struct ReviewScope<'a, R: Reviewer + ?Sized> {
    reviewer: &'a mut R,
}

impl<'a, R: Reviewer + ?Sized> ReviewScope<'a, R> {
    pub fn new(reviewer: &'a mut R) -> Self {
        Self { reviewer }
    }
}

impl<R: Reviewer + ?Sized> Deref for ReviewScope<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        self.reviewer
    }
}

impl<R: Reviewer + ?Sized> DerefMut for ReviewScope<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        self.reviewer
    }
}

impl<R: Reviewer + ?Sized> Drop for ReviewScope<'_, R> {
    fn drop(&mut self) {
        self.reviewer.close();
    }
}

/// Non-interactive reviewer: never pauses, never accepts.
///
/// With a render directory, every presented frame is written there as PNG.
#[derive(Clone, Debug, Default)]
pub struct HeadlessReviewer {
    render_dir: Option<PathBuf>,
    rendered: usize,
}

impl HeadlessReviewer {
    pub fn new(render_dir: Option<PathBuf>) -> Self {
        Self {
            render_dir,
            rendered: 0,
        }
    }

    pub fn rendered(&self) -> usize {
        self.rendered
    }
}

impl Reviewer for HeadlessReviewer {
    fn is_interactive(&self) -> bool {
        false
    }

    fn present(&mut self, view: &FrameView<'_>) -> ReviewControl {
        if let Some(dir) = &self.render_dir {
            let path = dir.join(format!(
                "spot_{:02}_frame_{:03}.png",
                view.spot_index + 1,
                view.step.frame_index
            ));
            match save_rgb_png(&render_overlay(view), &path) {
                Ok(()) => self.rendered += 1,
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to write overlay"),
            }
        }
        ReviewControl::Continue
    }

    fn wait_for_resume(&mut self) -> ReviewControl {
        ReviewControl::Continue
    }

    fn decide(&mut self, _view: &FrameView<'_>, _outcome: &TrackOutcome) -> Decision {
        Decision::Reject
    }

    fn close(&mut self) {
        debug!(rendered = self.rendered, "Headless review closed");
    }
}
