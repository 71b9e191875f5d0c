pub mod engine;
pub mod overlay;
pub mod phase;
pub mod review;
pub mod session;
pub mod state;
pub mod template;
pub mod tracker;

pub use engine::{SpotTrack, StepResult, TrackOutcome};
pub use review::{Decision, FrameView, HeadlessReviewer, ReviewControl, ReviewScope, Reviewer};
pub use session::{run_tracking, track_spots, SessionSummary};
pub use state::{TrackPhase, TrackState};
pub use tracker::{build_tracker, SingleObjectTracker, TrackerKind, TrackingConfig};
