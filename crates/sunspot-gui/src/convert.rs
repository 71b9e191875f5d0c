use image::imageops::FilterType;
use image::RgbImage;

/// Largest side shown in the window; bigger overlays are downscaled.
pub const MAX_DISPLAY_SIZE: u32 = 2048;

/// Convert an overlay to an egui ColorImage, shrinking it to fit
/// `MAX_DISPLAY_SIZE`.
pub fn overlay_to_color_image(overlay: &RgbImage) -> egui::ColorImage {
    let (w, h) = overlay.dimensions();
    let longest = w.max(h);

    let scaled;
    let image = if longest > MAX_DISPLAY_SIZE {
        let scale = MAX_DISPLAY_SIZE as f64 / longest as f64;
        let new_w = ((w as f64 * scale).round() as u32).max(1);
        let new_h = ((h as f64 * scale).round() as u32).max(1);
        scaled = image::imageops::resize(overlay, new_w, new_h, FilterType::Triangle);
        &scaled
    } else {
        overlay
    };

    let (w, h) = image.dimensions();
    egui::ColorImage::from_rgb([w as usize, h as usize], image.as_raw())
}
