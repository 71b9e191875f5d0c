use std::sync::mpsc::{self, TryRecvError};
use std::thread::JoinHandle;

use sunspot_core::config::SunspotConfig;
use sunspot_core::progress::Stage;
use sunspot_core::series::Series;
use tracing::warn;

use crate::messages::{ReviewEvent, ReviewKey};
use crate::panels;
use crate::worker::{self, SessionHandle};

/// What the session is waiting for.
#[derive(Clone, Debug, PartialEq)]
pub enum Prompt {
    Loading,
    Tracking,
    Paused,
    Decision(String),
    Done,
}

/// Viewport display state.
pub struct ViewportState {
    pub texture: Option<egui::TextureHandle>,
    /// Size of the tracked frame (before any display scaling).
    pub image_size: Option<[usize; 2]>,
    pub zoom: f32,
    pub pan_offset: egui::Vec2,
    pub viewing_label: String,
    pub failed: bool,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            texture: None,
            image_size: None,
            zoom: 1.0,
            pan_offset: egui::Vec2::ZERO,
            viewing_label: String::new(),
            failed: false,
        }
    }
}

pub struct SessionState {
    pub prompt: Prompt,
    pub progress: Option<(Stage, usize, Option<usize>)>,
    pub log_messages: Vec<String>,
}

impl SessionState {
    pub fn add_log(&mut self, message: impl Into<String>) {
        self.log_messages.push(message.into());
    }
}

pub struct ReviewApp {
    pub events: mpsc::Receiver<ReviewEvent>,
    /// `None` once the window is closing.
    pub keys: Option<mpsc::Sender<ReviewKey>>,
    session_thread: Option<JoinHandle<()>>,
    pub viewport: ViewportState,
    pub session: SessionState,
}

impl ReviewApp {
    pub fn new(ctx: &egui::Context, series: Series, config: SunspotConfig) -> std::io::Result<Self> {
        let dir = series.dir().display().to_string();
        let SessionHandle {
            events,
            keys,
            thread,
        } = worker::spawn_session(series, config, ctx.clone())?;

        let mut session = SessionState {
            prompt: Prompt::Loading,
            progress: None,
            log_messages: Vec::new(),
        };
        session.add_log(format!("Series: {dir}"));

        Ok(Self {
            events,
            keys: Some(keys),
            session_thread: Some(thread),
            viewport: ViewportState::default(),
            session,
        })
    }

    /// Drain all pending events from the session thread.
    fn poll_events(&mut self, ctx: &egui::Context) {
        loop {
            let event = match self.events.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            };
            match event {
                ReviewEvent::Frame {
                    image,
                    source_size,
                    spot_index,
                    spot_count,
                    frame_index,
                    frame_count,
                    success,
                } => {
                    let label = format!(
                        "Spot {}/{}  frame {}/{}",
                        spot_index + 1,
                        spot_count,
                        frame_index + 1,
                        frame_count
                    );
                    self.update_viewport_texture(ctx, image, source_size, label);
                    self.viewport.failed = !success;
                    self.session.prompt = Prompt::Tracking;
                    self.session.progress = None;
                }
                ReviewEvent::Paused => {
                    self.session.prompt = Prompt::Paused;
                }
                ReviewEvent::AwaitingDecision {
                    spot_index,
                    phase,
                    displacement,
                } => {
                    let detail = match displacement {
                        Some((dx, dy)) => format!("moved ({dx:.1}, {dy:.1}) px"),
                        None => "no end point".to_string(),
                    };
                    self.session.prompt =
                        Prompt::Decision(format!("Spot {}: {phase}, {detail}", spot_index + 1));
                }
                ReviewEvent::Progress {
                    stage,
                    items_done,
                    items_total,
                } => {
                    self.session.progress = Some((stage, items_done, items_total));
                }
                ReviewEvent::Log { message } => {
                    self.session.add_log(message);
                }
                ReviewEvent::Finished { message } => {
                    self.session.add_log(message);
                    self.session.prompt = Prompt::Done;
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
                ReviewEvent::Error { message } => {
                    self.session.add_log(format!("ERROR: {message}"));
                    self.session.prompt = Prompt::Done;
                    self.session.progress = None;
                }
            }
        }
    }

    fn update_viewport_texture(
        &mut self,
        ctx: &egui::Context,
        image: egui::ColorImage,
        source_size: [usize; 2],
        label: String,
    ) {
        match self.viewport.texture {
            Some(ref mut texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.viewport.texture =
                    Some(ctx.load_texture("frame", image, egui::TextureOptions::LINEAR));
            }
        }
        self.viewport.image_size = Some(source_size);
        self.viewport.viewing_label = label;
    }

    /// Forward key presses to the session while it is running.
    fn forward_keys(&self, ctx: &egui::Context) {
        if self.session.prompt == Prompt::Done {
            return;
        }
        let pressed: Vec<ReviewKey> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        repeat: false,
                        ..
                    } => Some(ReviewKey::from_egui(*key)),
                    _ => None,
                })
                .collect()
        });
        let Some(keys) = &self.keys else {
            return;
        };
        for key in pressed {
            let _ = keys.send(key);
        }
    }
}

impl eframe::App for ReviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_events(ctx);
        self.forward_keys(ctx);

        panels::status::show(ctx, self);
        panels::viewport::show(ctx, self);
    }
}

impl Drop for ReviewApp {
    /// Hang up the key channel so a session waiting for input cancels, then join it.
    fn drop(&mut self) {
        self.keys.take();
        if let Some(thread) = self.session_thread.take() {
            if thread.join().is_err() {
                warn!("Session thread panicked");
            }
        }
    }
}
