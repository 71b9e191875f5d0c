use std::path::Path;

use ndarray::Array2;

use crate::error::Result;
use crate::frame::Frame;
use crate::io::fits::FitsFile;

/// Rescale a raw image to the full 8-bit range.
///
/// Non-finite values are replaced by 0.0 first, so they take part in the
/// min/max search. A constant image maps to all zeros.
pub fn normalize(raw: &Array2<f32>) -> Array2<u8> {
    let finite = |v: f32| if v.is_finite() { v as f64 } else { 0.0 };

    let (min, max) = raw.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
        let v = finite(v);
        (lo.min(v), hi.max(v))
    });

    let span = max - min;
    if raw.is_empty() || span <= 0.0 {
        return Array2::zeros(raw.raw_dim());
    }

    raw.mapv(|v| ((finite(v) - min) / span * 255.0).round().clamp(0.0, 255.0) as u8)
}

/// Load the image of one HDU and normalize it.
pub fn load_normalized(path: &Path, hdu_index: usize, index: usize) -> Result<Frame> {
    let raw = FitsFile::open(path)?.read_image(hdu_index)?;
    Ok(Frame::new(normalize(&raw), index))
}
