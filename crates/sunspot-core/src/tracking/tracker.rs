use ndarray::{s, Array2};
use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_OVERSIZE, DEFAULT_PHASE_MIN_PEAK, DEFAULT_TEMPLATE_ADAPT_RATE,
    DEFAULT_TEMPLATE_MIN_SCORE, DEFAULT_TEMPLATE_SEARCH_RADIUS,
};
use crate::error::{Result, SunspotError};
use crate::frame::{BoundingBox, Frame};

use super::phase::PhaseCorrelationTracker;
use super::template::TemplateTracker;

/// Stateful estimator of one object's box across frames.
pub trait SingleObjectTracker: Send {
    /// Seed the tracker on `frame` with the object's box.
    fn init(&mut self, frame: &Frame, bbox: BoundingBox) -> Result<()>;

    /// Estimate the box on the next frame. `None` means the object was lost on
    /// this frame; the tracker keeps its last good estimate.
    fn update(&mut self, frame: &Frame) -> Option<BoundingBox>;

    fn name(&self) -> &'static str;
}

/// Which single-object tracker to use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackerKind {
    /// Normalized cross-correlation template search.
    #[default]
    Template,
    /// FFT phase correlation of the box region.
    PhaseCorrelation,
}

impl std::fmt::Display for TrackerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Template => write!(f, "template"),
            Self::PhaseCorrelation => write!(f, "phase-correlation"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackingConfig {
    #[serde(default)]
    pub tracker: TrackerKind,
    /// Padding (pixels) added on every side of a detected box.
    #[serde(default = "default_oversize")]
    pub oversize: i32,
    /// Template tracker: maximum shift (pixels) searched per frame.
    #[serde(default = "default_search_radius")]
    pub search_radius: i32,
    /// Template tracker: minimum correlation score for success.
    #[serde(default = "default_min_score")]
    pub min_score: f64,
    /// Template tracker: blend rate of the matched patch into the template.
    #[serde(default = "default_adapt_rate")]
    pub adapt_rate: f32,
    /// Phase tracker: minimum correlation peak for success.
    #[serde(default = "default_min_peak")]
    pub min_peak: f64,
}

fn default_oversize() -> i32 {
    DEFAULT_OVERSIZE
}
fn default_search_radius() -> i32 {
    DEFAULT_TEMPLATE_SEARCH_RADIUS
}
fn default_min_score() -> f64 {
    DEFAULT_TEMPLATE_MIN_SCORE
}
fn default_adapt_rate() -> f32 {
    DEFAULT_TEMPLATE_ADAPT_RATE
}
fn default_min_peak() -> f64 {
    DEFAULT_PHASE_MIN_PEAK
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            tracker: TrackerKind::default(),
            oversize: DEFAULT_OVERSIZE,
            search_radius: DEFAULT_TEMPLATE_SEARCH_RADIUS,
            min_score: DEFAULT_TEMPLATE_MIN_SCORE,
            adapt_rate: DEFAULT_TEMPLATE_ADAPT_RATE,
            min_peak: DEFAULT_PHASE_MIN_PEAK,
        }
    }
}

/// Construct a fresh tracker of the configured kind.
pub fn build_tracker(config: &TrackingConfig) -> Box<dyn SingleObjectTracker> {
    match config.tracker {
        TrackerKind::Template => Box::new(TemplateTracker::new(
            config.search_radius,
            config.min_score,
            config.adapt_rate,
        )),
        TrackerKind::PhaseCorrelation => Box::new(PhaseCorrelationTracker::new(config.min_peak)),
    }
}

/// Clip `bbox` to the frame, failing when nothing of it remains.
pub(crate) fn clip_to_frame(frame: &Frame, bbox: BoundingBox) -> Result<BoundingBox> {
    bbox.clip(frame.width(), frame.height()).ok_or_else(|| {
        SunspotError::InvalidParameter(format!(
            "Box {bbox:?} lies outside the {}x{} frame",
            frame.width(),
            frame.height()
        ))
    })
}

/// Copy the pixels under `bbox` as f32. The box must fit in the frame.
pub(crate) fn extract_patch(frame: &Frame, bbox: &BoundingBox) -> Array2<f32> {
    frame
        .data
        .slice(s![
            bbox.y as usize..bbox.bottom() as usize,
            bbox.x as usize..bbox.right() as usize
        ])
        .mapv(|v| v as f32)
}
