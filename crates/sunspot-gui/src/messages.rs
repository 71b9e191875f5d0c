use sunspot_core::progress::Stage;
use sunspot_core::tracking::TrackPhase;

/// Keys the operator can press while the review window has focus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReviewKey {
    Quit,
    Pause,
    Yes,
    No,
    Other,
}

impl ReviewKey {
    pub fn from_egui(key: egui::Key) -> Self {
        match key {
            egui::Key::Q => Self::Quit,
            egui::Key::P => Self::Pause,
            egui::Key::Y => Self::Yes,
            egui::Key::N => Self::No,
            _ => Self::Other,
        }
    }
}

/// Events sent from the tracking thread to the UI thread.
pub enum ReviewEvent {
    /// A tracked frame with its overlay, ready for display.
    Frame {
        image: egui::ColorImage,
        /// Size of the frame before any display downscaling.
        source_size: [usize; 2],
        spot_index: usize,
        spot_count: usize,
        frame_index: usize,
        frame_count: usize,
        success: bool,
    },

    /// The session is blocked until any key is pressed.
    Paused,

    /// The session is blocked on the accept/reject gate.
    AwaitingDecision {
        spot_index: usize,
        phase: TrackPhase,
        /// Measured displacement in pixels, when the track has an end point.
        displacement: Option<(f64, f64)>,
    },

    Progress {
        stage: Stage,
        items_done: usize,
        items_total: Option<usize>,
    },

    Log {
        message: String,
    },

    /// The run is over; the window may close.
    Finished {
        message: String,
    },

    Error {
        message: String,
    },
}
