use ndarray::{s, Array2, Zip};
use rayon::prelude::*;
use tracing::trace;

use crate::error::Result;
use crate::frame::{BoundingBox, Frame};

use super::tracker::{clip_to_frame, extract_patch, SingleObjectTracker};

/// Tracks a box by exhaustive normalized cross-correlation search around its
/// previous position.
pub struct TemplateTracker {
    search_radius: i32,
    min_score: f64,
    adapt_rate: f32,
    template: Array2<f32>,
    bbox: BoundingBox,
}

impl TemplateTracker {
    pub fn new(search_radius: i32, min_score: f64, adapt_rate: f32) -> Self {
        Self {
            search_radius: search_radius.max(0),
            min_score,
            adapt_rate: adapt_rate.clamp(0.0, 1.0),
            template: Array2::zeros((0, 0)),
            bbox: BoundingBox::default(),
        }
    }

    /// Best (score, dx, dy) over all shifts that keep the box inside the frame.
    fn search(&self, frame: &Frame) -> Option<(f64, i32, i32)> {
        let (w, h) = (frame.width(), frame.height());
        let r = self.search_radius;
        let data = frame.data.mapv(|v| v as f32);
        let template = ZeroMean::new(&self.template)?;

        let offsets: Vec<(i32, i32)> = (-r..=r)
            .flat_map(|dy| (-r..=r).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| self.bbox.translate(dx, dy).fits_within(w, h))
            .collect();

        let scores: Vec<f64> = offsets
            .par_iter()
            .map(|&(dx, dy)| {
                let candidate = self.bbox.translate(dx, dy);
                let window = data.slice(s![
                    candidate.y as usize..candidate.bottom() as usize,
                    candidate.x as usize..candidate.right() as usize
                ]);
                template.correlate(window)
            })
            .collect();

        // Ties prefer the smallest shift.
        let mut best: Option<(f64, i32, i32)> = None;
        for (&(dx, dy), &score) in offsets.iter().zip(&scores) {
            let closer = match best {
                None => true,
                Some((b, bx, by)) => {
                    score > b || (score == b && dx.abs() + dy.abs() < bx.abs() + by.abs())
                }
            };
            if closer {
                best = Some((score, dx, dy));
            }
        }
        best
    }
}

impl SingleObjectTracker for TemplateTracker {
    fn init(&mut self, frame: &Frame, bbox: BoundingBox) -> Result<()> {
        let bbox = clip_to_frame(frame, bbox)?;
        self.template = extract_patch(frame, &bbox);
        self.bbox = bbox;
        Ok(())
    }

    fn update(&mut self, frame: &Frame) -> Option<BoundingBox> {
        let (score, dx, dy) = self.search(frame)?;
        trace!(frame = frame.index, score, dx, dy, "Template match");
        if score < self.min_score {
            return None;
        }

        self.bbox = self.bbox.translate(dx, dy);
        if self.adapt_rate > 0.0 {
            let patch = extract_patch(frame, &self.bbox);
            let rate = self.adapt_rate;
            Zip::from(&mut self.template)
                .and(&patch)
                .for_each(|t, &p| *t = (1.0 - rate) * *t + rate * p);
        }
        Some(self.bbox)
    }

    fn name(&self) -> &'static str {
        "template"
    }
}

/// Template with its mean removed and its norm cached.
struct ZeroMean {
    values: Array2<f32>,
    norm: f64,
}

impl ZeroMean {
    fn new(template: &Array2<f32>) -> Option<Self> {
        if template.is_empty() {
            return None;
        }
        let mean = template.iter().map(|&v| v as f64).sum::<f64>() / template.len() as f64;
        let values = template.mapv(|v| (v as f64 - mean) as f32);
        let norm = values.iter().map(|&v| (v as f64).powi(2)).sum::<f64>().sqrt();
        Some(Self { values, norm })
    }

    /// Zero-normalized cross-correlation in [-1, 1]; flat windows score 0.
    fn correlate(&self, window: ndarray::ArrayView2<f32>) -> f64 {
        let n = window.len() as f64;
        let mean = window.iter().map(|&v| v as f64).sum::<f64>() / n;

        let mut dot = 0.0f64;
        let mut energy = 0.0f64;
        Zip::from(&self.values).and(&window).for_each(|&t, &v| {
            let v = v as f64 - mean;
            dot += t as f64 * v;
            energy += v * v;
        });

        let denom = self.norm * energy.sqrt();
        if denom <= crate::consts::EPSILON {
            0.0
        } else {
            dot / denom
        }
    }
}
