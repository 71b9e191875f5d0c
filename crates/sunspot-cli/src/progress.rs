use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};
use sunspot_core::progress::{ProgressReporter, Stage};

/// Terminal progress bars, one per stage.
#[derive(Default)]
pub struct BarReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl BarReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{msg:20} [{bar:40}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: Stage, total_items: Option<usize>) {
        let bar = match total_items {
            Some(total) => ProgressBar::new(total as u64).with_style(bar_style()),
            None => ProgressBar::new_spinner(),
        };
        bar.set_message(stage.to_string());
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(previous) = slot.replace(bar) {
                previous.finish_and_clear();
            }
        }
    }

    fn advance(&self, items_done: usize) {
        if let Ok(slot) = self.bar.lock() {
            if let Some(bar) = slot.as_ref() {
                bar.set_position(items_done as u64);
            }
        }
    }

    fn finish_stage(&self) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(bar) = slot.take() {
                bar.finish();
            }
        }
    }
}
