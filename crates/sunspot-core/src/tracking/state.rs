use serde::{Deserialize, Serialize};

use crate::frame::{BoundingBox, Point};

/// Lifecycle of one tracked spot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackPhase {
    /// Tracker seeded on the first frame.
    Initialized,
    Tracking,
    /// The last frame was tracked successfully; an end point exists.
    Completed,
    /// The last frame was lost; nothing can be persisted.
    Failed,
    /// The operator cancelled the run.
    Abandoned,
}

impl TrackPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Abandoned)
    }
}

impl std::fmt::Display for TrackPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized => write!(f, "initialized"),
            Self::Tracking => write!(f, "tracking"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
            Self::Abandoned => write!(f, "abandoned"),
        }
    }
}

/// Mutable per-spot tracking state.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackState {
    /// Detected box grown by the oversize margin.
    pub initial_box: BoundingBox,
    /// Centroid of the detected spot, the start of the displacement.
    pub initial_centroid: Point,
    pub current_box: BoundingBox,
    /// Index of the last frame handed to the tracker.
    pub frame_index: usize,
    pub last_success: bool,
    pub phase: TrackPhase,
}

impl TrackState {
    pub fn new(initial_box: BoundingBox, initial_centroid: Point) -> Self {
        Self {
            initial_box,
            initial_centroid,
            current_box: initial_box,
            frame_index: 0,
            last_success: false,
            phase: TrackPhase::Initialized,
        }
    }
}
