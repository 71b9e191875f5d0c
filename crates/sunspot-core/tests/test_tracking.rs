mod common;

use std::collections::VecDeque;

use tempfile::TempDir;

use common::{disk_frame, geometry, spot_at};
use sunspot_core::error::Result;
use sunspot_core::frame::{BoundingBox, Frame, Point};
use sunspot_core::progress::NoOpReporter;
use sunspot_core::store::{DisplacementRecord, DisplacementStore};
use sunspot_core::tracking::engine::track_spot;
use sunspot_core::tracking::overlay::{colors, render_overlay};
use sunspot_core::tracking::phase::PhaseCorrelationTracker;
use sunspot_core::tracking::template::TemplateTracker;
use sunspot_core::tracking::{
    track_spots, Decision, FrameView, HeadlessReviewer, ReviewControl, Reviewer,
    SingleObjectTracker, SpotTrack, TrackOutcome, TrackPhase, TrackingConfig,
};

/// Tracker that follows a script of per-frame successes, moving one pixel
/// right on every success.
struct ScriptedTracker {
    script: VecDeque<bool>,
    bbox: BoundingBox,
}

impl ScriptedTracker {
    fn boxed(script: &[bool]) -> Box<dyn SingleObjectTracker> {
        Box::new(Self {
            script: script.iter().copied().collect(),
            bbox: BoundingBox::default(),
        })
    }
}

impl SingleObjectTracker for ScriptedTracker {
    fn init(&mut self, _frame: &Frame, bbox: BoundingBox) -> Result<()> {
        self.bbox = bbox;
        Ok(())
    }

    fn update(&mut self, _frame: &Frame) -> Option<BoundingBox> {
        if self.script.pop_front().unwrap_or(false) {
            self.bbox = self.bbox.translate(1, 0);
            Some(self.bbox)
        } else {
            None
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Interactive reviewer with fixed answers that records how it was driven.
#[derive(Default)]
struct ScriptedReviewer {
    decision: Option<Decision>,
    cancel_on_present: Option<usize>,
    pause_on_present: Option<usize>,
    resume_with: Option<ReviewControl>,
    presents: usize,
    resumes: usize,
    decisions: Vec<TrackPhase>,
    failed_frames: usize,
    closes: usize,
}

impl ScriptedReviewer {
    fn accepting() -> Self {
        Self {
            decision: Some(Decision::Accept),
            ..Default::default()
        }
    }
}

impl Reviewer for ScriptedReviewer {
    fn is_interactive(&self) -> bool {
        true
    }

    fn present(&mut self, view: &FrameView<'_>) -> ReviewControl {
        self.presents += 1;
        if !view.step.success {
            self.failed_frames += 1;
        }
        if self.cancel_on_present == Some(self.presents) {
            ReviewControl::Cancel
        } else if self.pause_on_present == Some(self.presents) {
            ReviewControl::Pause
        } else {
            ReviewControl::Continue
        }
    }

    fn wait_for_resume(&mut self) -> ReviewControl {
        self.resumes += 1;
        self.resume_with.unwrap_or(ReviewControl::Continue)
    }

    fn decide(&mut self, _view: &FrameView<'_>, outcome: &TrackOutcome) -> Decision {
        self.decisions.push(outcome.phase);
        self.decision.unwrap_or(Decision::Reject)
    }

    fn close(&mut self) {
        self.closes += 1;
    }
}

fn blank_frames(n: usize) -> Vec<Frame> {
    (0..n).map(|i| disk_frame(200, 200, &[], i)).collect()
}

fn store_in(dir: &TempDir) -> DisplacementStore {
    DisplacementStore::in_series_dir(dir.path())
}

#[test]
fn test_failure_on_final_frame_never_persists() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let frames = blank_frames(4);
    let spots = [spot_at(100, 100, 10)];
    let mut reviewer = ScriptedReviewer::accepting();

    let summary = track_spots(
        &frames,
        &geometry((100, 100), 90, 200),
        &spots,
        &TrackingConfig::default(),
        || ScriptedTracker::boxed(&[true, true, false]),
        &mut reviewer,
        &store,
        &NoOpReporter,
    )
    .unwrap();

    assert_eq!(summary.outcomes[0].phase, TrackPhase::Failed);
    assert_eq!(summary.outcomes[0].end, None);
    assert!(summary.persisted.is_empty());
    // The gate is still shown, the answer is ignored.
    assert_eq!(reviewer.decisions, vec![TrackPhase::Failed]);
    assert!(store.read().unwrap().is_empty());
    assert!(!store.path().exists());
}

#[test]
fn test_recovered_track_completes_and_persists_on_accept() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let frames = blank_frames(4);
    let spots = [spot_at(100, 100, 10)];
    let mut reviewer = ScriptedReviewer::accepting();

    let summary = track_spots(
        &frames,
        &geometry((100, 100), 90, 200),
        &spots,
        &TrackingConfig::default(),
        || ScriptedTracker::boxed(&[false, true, true]),
        &mut reviewer,
        &store,
        &NoOpReporter,
    )
    .unwrap();

    let outcome = &summary.outcomes[0];
    assert_eq!(outcome.phase, TrackPhase::Completed);
    assert_eq!(reviewer.failed_frames, 1);

    // Oversized box (70, 70, 61, 61) moved right twice.
    let end = outcome.end.unwrap();
    assert_eq!((end.x, end.y), (102.5, 100.5));

    let records = store.read().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!((records[0].x1, records[0].y1), (100.0, 100.0));
    assert_eq!((records[0].x2, records[0].y2), (102.0, 100.0));
    assert_eq!(records[0].frame_span, 3.0);
    assert_eq!(reviewer.closes, 1);
}

#[test]
fn test_rejected_track_is_not_persisted() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let mut reviewer = ScriptedReviewer {
        decision: Some(Decision::Reject),
        ..Default::default()
    };

    let summary = track_spots(
        &blank_frames(3),
        &geometry((100, 100), 90, 200),
        &[spot_at(100, 100, 10)],
        &TrackingConfig::default(),
        || ScriptedTracker::boxed(&[true, true]),
        &mut reviewer,
        &store,
        &NoOpReporter,
    )
    .unwrap();

    assert_eq!(summary.count(TrackPhase::Completed), 1);
    assert!(summary.persisted.is_empty());
    assert!(store.read().unwrap().is_empty());
}

#[test]
fn test_non_interactive_run_never_persists() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let mut reviewer = HeadlessReviewer::default();

    let summary = track_spots(
        &blank_frames(3),
        &geometry((100, 100), 90, 200),
        &[spot_at(60, 60, 10), spot_at(140, 140, 10)],
        &TrackingConfig::default(),
        || ScriptedTracker::boxed(&[true, true]),
        &mut reviewer,
        &store,
        &NoOpReporter,
    )
    .unwrap();

    assert_eq!(summary.count(TrackPhase::Completed), 2);
    assert!(summary.persisted.is_empty());
    assert!(!store.path().exists());
}

#[test]
fn test_cancel_abandons_all_remaining_spots() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let mut reviewer = ScriptedReviewer {
        decision: Some(Decision::Accept),
        cancel_on_present: Some(4),
        ..Default::default()
    };

    // Three frames: two presents per spot. Cancel on the second spot's
    // second frame.
    let summary = track_spots(
        &blank_frames(3),
        &geometry((100, 100), 90, 200),
        &[spot_at(60, 60, 10), spot_at(100, 100, 10), spot_at(140, 140, 10)],
        &TrackingConfig::default(),
        || ScriptedTracker::boxed(&[true, true]),
        &mut reviewer,
        &store,
        &NoOpReporter,
    )
    .unwrap();

    assert!(summary.cancelled);
    assert_eq!(summary.outcomes.len(), 2);
    assert_eq!(summary.outcomes[0].phase, TrackPhase::Completed);
    assert_eq!(summary.outcomes[1].phase, TrackPhase::Abandoned);
    assert_eq!(reviewer.presents, 4);
    assert_eq!(reviewer.decisions.len(), 1);
    assert_eq!(reviewer.closes, 1);
    // Only the spot accepted before cancelling was written.
    assert_eq!(store.read().unwrap().len(), 1);
}

#[test]
fn test_cancel_before_any_decision_leaves_store_untouched() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let mut reviewer = ScriptedReviewer {
        decision: Some(Decision::Accept),
        pause_on_present: Some(1),
        resume_with: Some(ReviewControl::Cancel),
        ..Default::default()
    };

    let summary = track_spots(
        &blank_frames(5),
        &geometry((100, 100), 90, 200),
        &[spot_at(100, 100, 10)],
        &TrackingConfig::default(),
        || ScriptedTracker::boxed(&[true, true, true, true]),
        &mut reviewer,
        &store,
        &NoOpReporter,
    )
    .unwrap();

    assert!(summary.cancelled);
    assert_eq!(reviewer.resumes, 1);
    assert_eq!(reviewer.presents, 1);
    assert!(reviewer.decisions.is_empty());
    assert!(!store.path().exists());
    assert_eq!(reviewer.closes, 1);
}

#[test]
fn test_pause_then_resume_continues() {
    let dir = TempDir::new().unwrap();
    let mut reviewer = ScriptedReviewer {
        pause_on_present: Some(2),
        ..Default::default()
    };

    let summary = track_spots(
        &blank_frames(4),
        &geometry((100, 100), 90, 200),
        &[spot_at(100, 100, 10)],
        &TrackingConfig::default(),
        || ScriptedTracker::boxed(&[true, true, true]),
        &mut reviewer,
        &store_in(&dir),
        &NoOpReporter,
    )
    .unwrap();

    assert!(!summary.cancelled);
    assert_eq!(reviewer.resumes, 1);
    assert_eq!(reviewer.presents, 3);
    assert_eq!(summary.outcomes[0].phase, TrackPhase::Completed);
}

#[test]
fn test_reviewer_closed_on_error() {
    let dir = TempDir::new().unwrap();
    let mut reviewer = ScriptedReviewer::default();

    let result = track_spots(
        &[],
        &geometry((100, 100), 90, 200),
        &[spot_at(100, 100, 10)],
        &TrackingConfig::default(),
        || ScriptedTracker::boxed(&[]),
        &mut reviewer,
        &store_in(&dir),
        &NoOpReporter,
    );

    assert!(result.is_err());
    assert_eq!(reviewer.closes, 1);
}

#[test]
fn test_single_frame_series_fails() {
    let frames = blank_frames(1);
    let (outcome, steps) =
        track_spot(ScriptedTracker::boxed(&[]), &frames, &spot_at(100, 100, 10), 20).unwrap();
    assert!(steps.is_empty());
    assert_eq!(outcome.phase, TrackPhase::Failed);
    assert_eq!(outcome.record(), None);
}

#[test]
fn test_record_truncates_both_ends_to_whole_pixels() {
    let outcome = TrackOutcome {
        phase: TrackPhase::Completed,
        start: Point::new(100.7, 99.6),
        end: Some(Point::new(102.5, 100.5)),
        frame_span: 3,
        final_box: BoundingBox::new(72, 70, 61, 61),
    };
    assert_eq!(
        outcome.record(),
        Some(DisplacementRecord {
            x1: 100.0,
            y1: 99.0,
            x2: 102.0,
            y2: 100.0,
            frame_span: 3.0,
        })
    );

    let failed = TrackOutcome {
        phase: TrackPhase::Failed,
        ..outcome
    };
    assert_eq!(failed.record(), None);
}

#[test]
fn test_state_machine_phases() {
    let frames = blank_frames(3);
    let mut track = SpotTrack::start(
        ScriptedTracker::boxed(&[true, true]),
        &frames[0],
        &spot_at(100, 100, 10),
        20,
        frames.len(),
    )
    .unwrap();
    assert_eq!(track.state().phase, TrackPhase::Initialized);
    assert_eq!(track.state().initial_box, BoundingBox::new(70, 70, 61, 61));

    let step = track.step(&frames[1]);
    assert!(step.success);
    assert_eq!(track.state().phase, TrackPhase::Tracking);
    track.step(&frames[2]);
    let outcome = track.finish();
    assert_eq!(outcome.phase, TrackPhase::Completed);
    assert_eq!(outcome.frame_span, 2);
}

fn moving_disk_frames() -> Vec<Frame> {
    (0..6)
        .map(|k| disk_frame(200, 200, &[(60.0 + 3.0 * k as f64, 100.0, 10.0)], k))
        .collect()
}

#[test]
fn test_template_tracker_follows_moving_spot() {
    let frames = moving_disk_frames();
    let tracker = Box::new(TemplateTracker::new(30, 0.5, 0.0));
    let (outcome, steps) = track_spot(tracker, &frames, &spot_at(60, 100, 10), 20).unwrap();

    assert!(steps.iter().all(|s| s.success));
    assert_eq!(outcome.phase, TrackPhase::Completed);
    let end = outcome.end.unwrap();
    assert!((end.x - outcome.start.x - 15.0).abs() <= 1.0, "end {end:?}");
    assert!((end.y - outcome.start.y).abs() <= 1.0, "end {end:?}");
}

#[test]
fn test_template_tracker_reports_loss() {
    let mut frames = moving_disk_frames();
    // The spot vanishes on the last frame.
    frames[5] = disk_frame(200, 200, &[], 5);
    let tracker = Box::new(TemplateTracker::new(30, 0.5, 0.0));
    let (outcome, steps) = track_spot(tracker, &frames, &spot_at(60, 100, 10), 20).unwrap();

    assert!(!steps[4].success);
    assert_eq!(outcome.phase, TrackPhase::Failed);
}

#[test]
fn test_phase_tracker_follows_moving_spot() {
    let frames: Vec<Frame> = (0..2)
        .map(|k| disk_frame(200, 200, &[(60.0 + 3.0 * k as f64, 100.0, 10.0)], k))
        .collect();
    let tracker = Box::new(PhaseCorrelationTracker::new(0.05));
    let (outcome, _) = track_spot(tracker, &frames, &spot_at(60, 100, 10), 20).unwrap();

    assert_eq!(outcome.phase, TrackPhase::Completed);
    let end = outcome.end.unwrap();
    assert!((end.x - outcome.start.x - 3.0).abs() <= 1.0, "end {end:?}");
}

#[test]
fn test_overlay_marks_failed_frames() {
    let frames = blank_frames(2);
    let geometry = geometry((100, 100), 90, 200);
    let mut track = SpotTrack::start(
        ScriptedTracker::boxed(&[false]),
        &frames[0],
        &spot_at(100, 100, 10),
        20,
        2,
    )
    .unwrap();
    let step = track.step(&frames[1]);
    let view = FrameView {
        frame: &frames[1],
        geometry: &geometry,
        spot_index: 0,
        spot_count: 1,
        frame_count: 2,
        start: track.state().initial_centroid,
        step,
    };

    let image = render_overlay(&view);
    assert_eq!(image.dimensions(), (200, 200));
    assert_eq!(*image.get_pixel(2, 197), colors::RED);
    assert_eq!(*image.get_pixel(197, 2), colors::RED);
}

#[test]
fn test_headless_reviewer_renders_frames() {
    let dir = TempDir::new().unwrap();
    let render_dir = dir.path().join("render");
    let mut reviewer = HeadlessReviewer::new(Some(render_dir.clone()));

    track_spots(
        &blank_frames(3),
        &geometry((100, 100), 90, 200),
        &[spot_at(100, 100, 10)],
        &TrackingConfig::default(),
        || ScriptedTracker::boxed(&[true, true]),
        &mut reviewer,
        &store_in(&dir),
        &NoOpReporter,
    )
    .unwrap();

    assert_eq!(reviewer.rendered(), 2);
    assert!(render_dir.join("spot_01_frame_001.png").is_file());
    assert!(render_dir.join("spot_01_frame_002.png").is_file());
}
