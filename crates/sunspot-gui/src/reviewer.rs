use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use sunspot_core::tracking::overlay::render_overlay;
use sunspot_core::tracking::{Decision, FrameView, ReviewControl, Reviewer, TrackOutcome};
use tracing::debug;

use crate::convert::overlay_to_color_image;
use crate::messages::{ReviewEvent, ReviewKey};

/// How long each frame stays on screen before the session moves on.
const FRAME_DELAY: Duration = Duration::from_millis(30);

/// Reviewer that shows frames in the review window and reads the operator's
/// keys from it.
///
/// A closed window counts as cancel while tracking and as reject at the gate.
pub struct ChannelReviewer {
    events: mpsc::Sender<ReviewEvent>,
    keys: mpsc::Receiver<ReviewKey>,
    ctx: egui::Context,
}

impl ChannelReviewer {
    pub fn new(
        events: mpsc::Sender<ReviewEvent>,
        keys: mpsc::Receiver<ReviewKey>,
        ctx: egui::Context,
    ) -> Self {
        Self { events, keys, ctx }
    }

    fn send(&self, event: ReviewEvent) {
        let _ = self.events.send(event);
        self.ctx.request_repaint();
    }

    /// Drop keys pressed before the current prompt was shown.
    fn discard_pending_keys(&self) {
        while self.keys.try_recv().is_ok() {}
    }
}

impl Reviewer for ChannelReviewer {
    fn is_interactive(&self) -> bool {
        true
    }

    fn present(&mut self, view: &FrameView<'_>) -> ReviewControl {
        let overlay = render_overlay(view);
        self.send(ReviewEvent::Frame {
            image: overlay_to_color_image(&overlay),
            source_size: [view.frame.width(), view.frame.height()],
            spot_index: view.spot_index,
            spot_count: view.spot_count,
            frame_index: view.step.frame_index,
            frame_count: view.frame_count,
            success: view.step.success,
        });

        match self.keys.recv_timeout(FRAME_DELAY) {
            Ok(ReviewKey::Quit) | Err(RecvTimeoutError::Disconnected) => ReviewControl::Cancel,
            Ok(ReviewKey::Pause) => ReviewControl::Pause,
            Ok(_) | Err(RecvTimeoutError::Timeout) => ReviewControl::Continue,
        }
    }

    fn wait_for_resume(&mut self) -> ReviewControl {
        self.send(ReviewEvent::Paused);
        match self.keys.recv() {
            Ok(ReviewKey::Quit) | Err(_) => ReviewControl::Cancel,
            Ok(_) => ReviewControl::Continue,
        }
    }

    fn decide(&mut self, view: &FrameView<'_>, outcome: &TrackOutcome) -> Decision {
        self.discard_pending_keys();
        self.send(ReviewEvent::AwaitingDecision {
            spot_index: view.spot_index,
            phase: outcome.phase,
            displacement: outcome
                .end
                .map(|end| (end.x - outcome.start.x, end.y - outcome.start.y)),
        });

        loop {
            match self.keys.recv() {
                Ok(ReviewKey::Yes) => return Decision::Accept,
                Ok(ReviewKey::No) | Err(_) => return Decision::Reject,
                Ok(_) => {}
            }
        }
    }

    fn close(&mut self) {
        debug!("Review session closed");
        self.send(ReviewEvent::Log {
            message: "Review session closed".into(),
        });
    }
}
