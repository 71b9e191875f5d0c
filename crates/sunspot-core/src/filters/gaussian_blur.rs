use ndarray::{Array2, Axis};
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::frame::Frame;

/// Standard deviation used for a Gaussian kernel of the given odd size.
pub fn sigma_for_kernel_size(size: usize) -> f32 {
    0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalized 1-D Gaussian kernel with `size` taps.
pub fn gaussian_kernel(size: usize) -> Vec<f32> {
    let size = size.max(1) | 1;
    let sigma = sigma_for_kernel_size(size);
    let radius = (size / 2) as f32;
    let s2 = 2.0 * sigma * sigma;

    let mut kernel: Vec<f32> = (0..size)
        .map(|i| {
            let x = i as f32 - radius;
            (-x * x / s2).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    for v in &mut kernel {
        *v /= sum;
    }
    kernel
}

/// Smooth a normalized frame with a square Gaussian kernel, rounding back to u8.
pub fn blur_frame(frame: &Frame, kernel_size: usize) -> Frame {
    let data = frame.data.mapv(|v| v as f32);
    let blurred = gaussian_blur_array(&data, kernel_size);
    Frame::new(
        blurred.mapv(|v| v.round().clamp(0.0, 255.0) as u8),
        frame.index,
    )
}

/// Separable Gaussian blur; the border replicates edge pixels.
pub fn gaussian_blur_array(data: &Array2<f32>, kernel_size: usize) -> Array2<f32> {
    let kernel = gaussian_kernel(kernel_size);
    let row_pass = convolve(data, &kernel, Axis(1));
    convolve(&row_pass, &kernel, Axis(0))
}

/// 1-D convolution along `axis` with clamp-to-edge sampling.
fn convolve(data: &Array2<f32>, kernel: &[f32], axis: Axis) -> Array2<f32> {
    let (h, w) = data.dim();
    let radius = (kernel.len() / 2) as isize;
    let along_rows = axis == Axis(1);
    let len = if along_rows { w } else { h } as isize;

    let sample = |row: usize, col: usize| -> f32 {
        let mut sum = 0.0f32;
        for (ki, &kv) in kernel.iter().enumerate() {
            let offset = ki as isize - radius;
            let v = if along_rows {
                let c = (col as isize + offset).clamp(0, len - 1) as usize;
                data[[row, c]]
            } else {
                let r = (row as isize + offset).clamp(0, len - 1) as usize;
                data[[r, col]]
            };
            sum += v * kv;
        }
        sum
    };

    let mut result = Array2::<f32>::zeros((h, w));
    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        result
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(row, mut out)| {
                for col in 0..w {
                    out[col] = sample(row, col);
                }
            });
    } else {
        for row in 0..h {
            for col in 0..w {
                result[[row, col]] = sample(row, col);
            }
        }
    }
    result
}
