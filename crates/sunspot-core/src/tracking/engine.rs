use tracing::debug;

use crate::detection::GroupedSpot;
use crate::error::Result;
use crate::frame::{BoundingBox, Frame, Point};
use crate::store::DisplacementRecord;

use super::state::{TrackPhase, TrackState};
use super::tracker::SingleObjectTracker;

/// Result of advancing a track by one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepResult {
    pub frame_index: usize,
    pub success: bool,
    /// Tracker box after the update (the previous box on failure).
    pub bbox: BoundingBox,
    /// Center of the tracked box on success.
    pub center: Option<Point>,
}

/// Terminal result of one spot's track.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackOutcome {
    pub phase: TrackPhase,
    pub start: Point,
    /// Box center on the last frame, present only when that frame succeeded.
    pub end: Option<Point>,
    /// Frame intervals between the first and last frame.
    pub frame_span: usize,
    pub final_box: BoundingBox,
}

impl TrackOutcome {
    /// Measurement for persistence; only completed tracks have one.
    ///
    /// Both ends are stored as whole pixels, truncated toward zero.
    pub fn record(&self) -> Option<DisplacementRecord> {
        if self.phase != TrackPhase::Completed {
            return None;
        }
        let (x1, y1) = self.start.truncated();
        let (x2, y2) = self.end?.truncated();
        Some(DisplacementRecord {
            x1: x1 as f64,
            y1: y1 as f64,
            x2: x2 as f64,
            y2: y2 as f64,
            frame_span: self.frame_span as f64,
        })
    }
}

/// Tracking state machine for one spot, independent of any display.
pub struct SpotTrack {
    tracker: Box<dyn SingleObjectTracker>,
    state: TrackState,
    frame_count: usize,
    end_point: Option<Point>,
}

impl SpotTrack {
    /// Seed `tracker` on the first frame with the spot box grown by `oversize`.
    pub fn start(
        mut tracker: Box<dyn SingleObjectTracker>,
        first: &Frame,
        spot: &GroupedSpot,
        oversize: i32,
        frame_count: usize,
    ) -> Result<Self> {
        let initial_box = spot.bbox.expand(oversize);
        tracker.init(first, initial_box)?;
        debug!(
            tracker = tracker.name(),
            x = initial_box.x,
            y = initial_box.y,
            width = initial_box.width,
            height = initial_box.height,
            "Tracker initialized"
        );

        Ok(Self {
            tracker,
            state: TrackState::new(initial_box, spot.centroid),
            frame_count,
            end_point: None,
        })
    }

    pub fn state(&self) -> &TrackState {
        &self.state
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Advance the tracker over the next frame of the series. Frames must be
    /// passed in order, starting with the second one.
    ///
    /// A failed update is recorded but does not change the phase; a later
    /// frame may still succeed.
    pub fn step(&mut self, frame: &Frame) -> StepResult {
        let result = self.tracker.update(frame);
        self.state.phase = TrackPhase::Tracking;
        self.state.frame_index += 1;
        self.state.last_success = result.is_some();

        let center = result.map(|bbox| {
            self.state.current_box = bbox;
            bbox.center()
        });
        if self.state.frame_index + 1 == self.frame_count {
            self.end_point = center;
        }

        StepResult {
            frame_index: self.state.frame_index,
            success: result.is_some(),
            bbox: self.state.current_box,
            center,
        }
    }

    /// Stop the track because the operator cancelled.
    pub fn abandon(mut self) -> TrackOutcome {
        self.state.phase = TrackPhase::Abandoned;
        self.end_point = None;
        self.outcome()
    }

    /// Close the track after the last frame.
    pub fn finish(mut self) -> TrackOutcome {
        let reached_last = self.state.frame_index + 1 == self.frame_count;
        self.state.phase = if reached_last && self.state.last_success && self.end_point.is_some() {
            TrackPhase::Completed
        } else {
            TrackPhase::Failed
        };
        self.outcome()
    }

    fn outcome(&self) -> TrackOutcome {
        TrackOutcome {
            phase: self.state.phase,
            start: self.state.initial_centroid,
            end: self.end_point,
            frame_span: self.frame_count.saturating_sub(1),
            final_box: self.state.current_box,
        }
    }
}

/// Run a track over a whole series without presentation.
pub fn track_spot(
    tracker: Box<dyn SingleObjectTracker>,
    frames: &[Frame],
    spot: &GroupedSpot,
    oversize: i32,
) -> Result<(TrackOutcome, Vec<StepResult>)> {
    let Some(first) = frames.first() else {
        return Err(crate::error::SunspotError::EmptyResult(
            "No frames to track".into(),
        ));
    };
    let mut track = SpotTrack::start(tracker, first, spot, oversize, frames.len())?;
    let steps = frames[1..].iter().map(|f| track.step(f)).collect();
    Ok((track.finish(), steps))
}
