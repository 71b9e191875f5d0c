//! Review overlays drawn on top of a tracked frame.

use image::{imageops, Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_circle_mut, draw_hollow_rect_mut,
    draw_line_segment_mut,
};
use imageproc::rect::Rect;

use crate::consts::{
    FAILURE_BORDER_WIDTH, INSET_MARGIN, INSET_POSITION, INSET_ZOOM, LIMB_GUIDE_RATIO,
    OVERLAY_LINE_THICKNESS,
};
use crate::frame::{BoundingBox, Frame, Point};

use super::review::FrameView;

pub mod colors {
    use image::Rgb;

    pub const RED: Rgb<u8> = Rgb([255, 0, 0]);
    pub const BLUE: Rgb<u8> = Rgb([0, 0, 255]);
    /// 90 % limb guide.
    pub const TEAL: Rgb<u8> = Rgb([0, 200, 200]);
    /// Start point marker.
    pub const MINT: Rgb<u8> = Rgb([0, 255, 150]);
}

/// Render the review overlay for one tracked frame.
pub fn render_overlay(view: &FrameView<'_>) -> RgbImage {
    let base = gray_to_rgb(view.frame);
    let mut image = base.clone();
    let (w, h) = image.dimensions();

    let center = view.geometry.disk_center_px;
    let radius = view.geometry.disk_radius_px;
    thick_circle(&mut image, center, radius, colors::BLUE);
    thick_circle(
        &mut image,
        center,
        (radius as f64 * LIMB_GUIDE_RATIO) as i32,
        colors::TEAL,
    );
    horizontal_line(&mut image, center.1 as f32, colors::RED);

    crosshair(&mut image, view.start, colors::BLUE);
    let start = view.start.truncated();
    draw_filled_circle_mut(&mut image, start, 2, colors::MINT);

    if let Some(current) = view.step.center {
        crosshair(&mut image, current, colors::RED);
    }
    thick_rect(&mut image, &view.step.bbox, colors::RED);

    paste_inset(&mut image, &base, &view.step.bbox);

    if !view.step.success {
        failure_border(&mut image, w, h);
    }
    image
}

/// Grayscale frame expanded to RGB.
pub fn gray_to_rgb(frame: &Frame) -> RgbImage {
    let (h, w) = frame.data.dim();
    RgbImage::from_fn(w as u32, h as u32, |x, y| {
        let v = frame.data[[y as usize, x as usize]];
        Rgb([v, v, v])
    })
}

fn offsets() -> std::ops::RangeInclusive<i32> {
    let half = OVERLAY_LINE_THICKNESS / 2;
    -half..=half
}

fn thick_circle(image: &mut RgbImage, center: (i32, i32), radius: i32, color: Rgb<u8>) {
    for d in offsets() {
        if radius + d > 0 {
            draw_hollow_circle_mut(image, center, radius + d, color);
        }
    }
}

fn horizontal_line(image: &mut RgbImage, y: f32, color: Rgb<u8>) {
    let w = image.width() as f32;
    for d in offsets() {
        let yy = y + d as f32;
        draw_line_segment_mut(image, (0.0, yy), (w - 1.0, yy), color);
    }
}

fn vertical_line(image: &mut RgbImage, x: f32, color: Rgb<u8>) {
    let h = image.height() as f32;
    for d in offsets() {
        let xx = x + d as f32;
        draw_line_segment_mut(image, (xx, 0.0), (xx, h - 1.0), color);
    }
}

fn crosshair(image: &mut RgbImage, point: Point, color: Rgb<u8>) {
    let (x, y) = point.truncated();
    horizontal_line(image, y as f32, color);
    vertical_line(image, x as f32, color);
}

fn thick_rect(image: &mut RgbImage, bbox: &BoundingBox, color: Rgb<u8>) {
    for d in offsets() {
        let grown = bbox.expand(d);
        if grown.width > 0 && grown.height > 0 {
            let rect = Rect::at(grown.x, grown.y).of_size(grown.width as u32, grown.height as u32);
            draw_hollow_rect_mut(image, rect, color);
        }
    }
}

/// Magnified copy of the region around `bbox`, pasted near the top-left
/// corner. Skipped when the magnified region does not fit.
fn paste_inset(image: &mut RgbImage, base: &RgbImage, bbox: &BoundingBox) {
    let (w, h) = base.dimensions();
    let Some(region) = bbox
        .expand(INSET_MARGIN)
        .clip(w as usize, h as usize)
    else {
        return;
    };

    let zoomed_w = region.width as u32 * INSET_ZOOM;
    let zoomed_h = region.height as u32 * INSET_ZOOM;
    if INSET_POSITION + zoomed_w > w || INSET_POSITION + zoomed_h > h {
        return;
    }

    let crop = imageops::crop_imm(
        base,
        region.x as u32,
        region.y as u32,
        region.width as u32,
        region.height as u32,
    )
    .to_image();
    let mut inset = imageops::resize(&crop, zoomed_w, zoomed_h, imageops::FilterType::Nearest);

    let mid = Point::new(zoomed_w as f64 / 2.0, zoomed_h as f64 / 2.0);
    crosshair(&mut inset, mid, colors::RED);
    imageops::replace(
        image,
        &inset,
        INSET_POSITION as i64,
        INSET_POSITION as i64,
    );
}

fn failure_border(image: &mut RgbImage, w: u32, h: u32) {
    if w == 0 || h == 0 {
        return;
    }
    let b = FAILURE_BORDER_WIDTH.min(w / 2).min(h / 2).max(1);
    let bands = [
        Rect::at(0, 0).of_size(w, b),
        Rect::at(0, (h - b) as i32).of_size(w, b),
        Rect::at(0, 0).of_size(b, h),
        Rect::at((w - b) as i32, 0).of_size(b, h),
    ];
    for band in bands {
        draw_filled_rect_mut(image, band, colors::RED);
    }
}
