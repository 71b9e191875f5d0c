use std::sync::mpsc;
use std::thread::JoinHandle;

use sunspot_core::config::SunspotConfig;
use sunspot_core::series::Series;
use sunspot_core::tracking::{run_tracking, SessionSummary, TrackPhase};
use tracing::{error, info};

use crate::messages::{ReviewEvent, ReviewKey};
use crate::progress::ChannelProgressReporter;
use crate::reviewer::ChannelReviewer;

/// Channels connecting the UI thread to a running session.
pub struct SessionHandle {
    pub events: mpsc::Receiver<ReviewEvent>,
    pub keys: mpsc::Sender<ReviewKey>,
    pub thread: JoinHandle<()>,
}

/// Run the tracking session for `series` on its own thread.
pub fn spawn_session(
    series: Series,
    config: SunspotConfig,
    ctx: egui::Context,
) -> std::io::Result<SessionHandle> {
    let (event_tx, event_rx) = mpsc::channel();
    let (key_tx, key_rx) = mpsc::channel();

    let thread = std::thread::Builder::new()
        .name("sunspot-session".into())
        .spawn(move || {
            let progress = ChannelProgressReporter::new(event_tx.clone(), ctx.clone());
            let mut reviewer = ChannelReviewer::new(event_tx.clone(), key_rx, ctx.clone());

            let event = match run_tracking(&series, &config, &mut reviewer, &progress) {
                Ok(summary) => {
                    let message = describe(&summary);
                    info!(series = series.index(), "{message}");
                    ReviewEvent::Finished { message }
                }
                Err(e) => {
                    error!(series = series.index(), error = %e, "Tracking failed");
                    ReviewEvent::Error {
                        message: e.to_string(),
                    }
                }
            };
            let _ = event_tx.send(event);
            ctx.request_repaint();
        })?;

    Ok(SessionHandle {
        events: event_rx,
        keys: key_tx,
        thread,
    })
}

fn describe(summary: &SessionSummary) -> String {
    let mut message = format!(
        "{} spots, {} completed, {} saved",
        summary.spots,
        summary.count(TrackPhase::Completed),
        summary.persisted.len()
    );
    if summary.cancelled {
        message.push_str(" (cancelled)");
    }
    message
}
