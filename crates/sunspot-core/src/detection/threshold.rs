use ndarray::{Array2, Zip};

use crate::filters::gaussian_blur::gaussian_blur_array;

/// Inverted adaptive Gaussian threshold.
///
/// The local threshold is the Gaussian-weighted mean over a `block_size`
/// neighborhood (rounded to u8) minus `offset`. A pixel is foreground when it
/// is at or below its local threshold, so dark features become `true`.
pub fn adaptive_threshold_inv(data: &Array2<u8>, block_size: usize, offset: i32) -> Array2<bool> {
    let local_mean = gaussian_blur_array(&data.mapv(|v| v as f32), block_size);

    let mut mask = Array2::from_elem(data.raw_dim(), false);
    Zip::from(&mut mask)
        .and(data)
        .and(&local_mean)
        .for_each(|m, &v, &mean| {
            let mean = mean.round().clamp(0.0, 255.0) as i32;
            *m = v as i32 <= mean - offset;
        });
    mask
}
