use std::path::Path;

use image::{GrayImage, ImageFormat, Luma, RgbImage};

use crate::error::{Result, SunspotError};
use crate::frame::Frame;

/// Copy a normalized frame into an 8-bit grayscale image buffer.
pub fn frame_to_gray(frame: &Frame) -> GrayImage {
    let (h, w) = frame.data.dim();
    let mut img = GrayImage::new(w as u32, h as u32);
    for ((row, col), &val) in frame.data.indexed_iter() {
        img.put_pixel(col as u32, row as u32, Luma([val]));
    }
    img
}

/// Save a frame as 8-bit grayscale PNG.
pub fn save_png(frame: &Frame, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    frame_to_gray(frame).save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Save a rendered overlay as 8-bit RGB PNG.
pub fn save_rgb_png(image: &RgbImage, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    image.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            std::fs::create_dir_all(dir).map_err(SunspotError::Io)
        }
        _ => Ok(()),
    }
}
