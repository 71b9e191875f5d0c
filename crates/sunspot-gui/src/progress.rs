use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Mutex};

use sunspot_core::progress::{ProgressReporter, Stage};

use crate::messages::ReviewEvent;

/// Progress reporter that sends updates over an mpsc channel to the UI thread.
pub struct ChannelProgressReporter {
    tx: Mutex<mpsc::Sender<ReviewEvent>>,
    ctx: egui::Context,
    stage: Mutex<Stage>,
    current_total: AtomicUsize,
}

impl ChannelProgressReporter {
    pub fn new(tx: mpsc::Sender<ReviewEvent>, ctx: egui::Context) -> Self {
        Self {
            tx: Mutex::new(tx),
            ctx,
            stage: Mutex::new(Stage::Loading),
            current_total: AtomicUsize::new(0),
        }
    }

    fn send(&self, items_done: usize) {
        let total = self.current_total.load(Ordering::Relaxed);
        let stage = self.stage.lock().map(|s| *s).unwrap_or(Stage::Loading);
        if let Ok(tx) = self.tx.lock() {
            let _ = tx.send(ReviewEvent::Progress {
                stage,
                items_done,
                items_total: (total > 0).then_some(total),
            });
        }
        self.ctx.request_repaint();
    }
}

impl ProgressReporter for ChannelProgressReporter {
    fn begin_stage(&self, stage: Stage, total_items: Option<usize>) {
        self.current_total
            .store(total_items.unwrap_or(0), Ordering::Relaxed);
        if let Ok(mut current) = self.stage.lock() {
            *current = stage;
        }
        self.send(0);
    }

    fn advance(&self, items_done: usize) {
        self.send(items_done);
    }
}
