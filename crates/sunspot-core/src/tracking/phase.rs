use ndarray::Array2;
use num_complex::Complex;
use rustfft::FftPlanner;
use tracing::trace;

use crate::consts::EPSILON;
use crate::error::Result;
use crate::frame::{BoundingBox, Frame};

use super::tracker::{clip_to_frame, extract_patch, SingleObjectTracker};

/// Tracks a box by phase correlation between the initial patch and the patch
/// under the current box.
pub struct PhaseCorrelationTracker {
    min_peak: f64,
    reference_fft: Array2<Complex<f64>>,
    bbox: BoundingBox,
}

impl PhaseCorrelationTracker {
    pub fn new(min_peak: f64) -> Self {
        Self {
            min_peak,
            reference_fft: Array2::zeros((0, 0)),
            bbox: BoundingBox::default(),
        }
    }
}

impl SingleObjectTracker for PhaseCorrelationTracker {
    fn init(&mut self, frame: &Frame, bbox: BoundingBox) -> Result<()> {
        let bbox = clip_to_frame(frame, bbox)?;
        self.reference_fft = fft2d(&prepare(&extract_patch(frame, &bbox)));
        self.bbox = bbox;
        Ok(())
    }

    fn update(&mut self, frame: &Frame) -> Option<BoundingBox> {
        if !self.bbox.fits_within(frame.width(), frame.height()) {
            return None;
        }
        let patch = extract_patch(frame, &self.bbox);
        let (dx, dy, peak) = displacement(&self.reference_fft, &patch);
        trace!(frame = frame.index, peak, dx, dy, "Phase correlation");
        if peak < self.min_peak {
            return None;
        }

        let moved = self.bbox.translate(dx, dy);
        if !moved.fits_within(frame.width(), frame.height()) {
            return None;
        }
        self.bbox = moved;
        Some(moved)
    }

    fn name(&self) -> &'static str {
        "phase-correlation"
    }
}

/// Integer shift of `target` relative to the reference, with the peak height.
fn displacement(reference_fft: &Array2<Complex<f64>>, target: &Array2<f32>) -> (i32, i32, f64) {
    let (h, w) = target.dim();
    let target_fft = fft2d(&prepare(target));
    let correlation = ifft2d(&normalized_cross_power(reference_fft, &target_fft));
    let (peak_row, peak_col, peak) = find_peak(&correlation);

    // Peaks past the midpoint wrap around to negative shifts.
    let dy = if peak_row > h / 2 {
        peak_row as i32 - h as i32
    } else {
        peak_row as i32
    };
    let dx = if peak_col > w / 2 {
        peak_col as i32 - w as i32
    } else {
        peak_col as i32
    };
    (dx, dy, peak)
}

/// Remove the mean and taper the edges.
fn prepare(patch: &Array2<f32>) -> Array2<f32> {
    let mean = patch.mean().unwrap_or(0.0);
    apply_hann(&patch.mapv(|v| v - mean))
}

fn apply_hann(data: &Array2<f32>) -> Array2<f32> {
    let (h, w) = data.dim();
    let mut result = Array2::<f32>::zeros((h, w));

    for row in 0..h {
        let wy = 0.5 * (1.0 - (std::f64::consts::TAU * row as f64 / h as f64).cos());
        for col in 0..w {
            let wx = 0.5 * (1.0 - (std::f64::consts::TAU * col as f64 / w as f64).cos());
            result[[row, col]] = data[[row, col]] * (wy * wx) as f32;
        }
    }

    result
}

/// 2D FFT: row-wise, then column-wise.
fn fft2d(data: &Array2<f32>) -> Array2<Complex<f64>> {
    let mut result = data.mapv(|v| Complex::new(v as f64, 0.0));
    transform(&mut result, false);
    result
}

fn ifft2d(data: &Array2<Complex<f64>>) -> Array2<f64> {
    let (h, w) = data.dim();
    let mut work = data.clone();
    transform(&mut work, true);
    let scale = 1.0 / (h * w).max(1) as f64;
    work.mapv(|c| c.re * scale)
}

fn transform(data: &mut Array2<Complex<f64>>, inverse: bool) {
    let (h, w) = data.dim();
    if h == 0 || w == 0 {
        return;
    }
    let mut planner = FftPlanner::new();
    let (fft_row, fft_col) = if inverse {
        (planner.plan_fft_inverse(w), planner.plan_fft_inverse(h))
    } else {
        (planner.plan_fft_forward(w), planner.plan_fft_forward(h))
    };

    for mut row in data.rows_mut() {
        let mut buf: Vec<Complex<f64>> = row.to_vec();
        fft_row.process(&mut buf);
        row.iter_mut().zip(buf).for_each(|(dst, v)| *dst = v);
    }
    for mut col in data.columns_mut() {
        let mut buf: Vec<Complex<f64>> = col.to_vec();
        fft_col.process(&mut buf);
        col.iter_mut().zip(buf).for_each(|(dst, v)| *dst = v);
    }
}

/// conj(R) * T, normalized to unit magnitude; the correlation peak lands at
/// the displacement of T relative to R.
fn normalized_cross_power(
    reference: &Array2<Complex<f64>>,
    target: &Array2<Complex<f64>>,
) -> Array2<Complex<f64>> {
    let mut result = Array2::<Complex<f64>>::zeros(target.raw_dim());
    ndarray::Zip::from(&mut result)
        .and(reference)
        .and(target)
        .for_each(|out, r, t| {
            let cross = r.conj() * t;
            let mag = cross.norm();
            *out = if mag > EPSILON {
                cross / mag
            } else {
                Complex::new(0.0, 0.0)
            };
        });
    result
}

fn find_peak(data: &Array2<f64>) -> (usize, usize, f64) {
    let mut best = (0, 0, f64::NEG_INFINITY);
    for ((row, col), &v) in data.indexed_iter() {
        if v > best.2 {
            best = (row, col, v);
        }
    }
    best
}
