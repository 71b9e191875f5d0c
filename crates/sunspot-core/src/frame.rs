use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// A single normalized grayscale image of a series.
/// Pixel values are u8 in [0, 255].
#[derive(Clone, Debug)]
pub struct Frame {
    /// Pixel data, row-major, shape = (height, width)
    pub data: Array2<u8>,
    /// Position of the frame in the series manifest
    pub index: usize,
}

impl Frame {
    pub fn new(data: Array2<u8>, index: usize) -> Self {
        Self { data, index }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }
}

/// A point in pixel coordinates (`x` = column, `y` = row).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Integer pixel position, truncated toward zero.
    pub fn truncated(&self) -> (i32, i32) {
        (self.x as i32, self.y as i32)
    }
}

/// Axis-aligned box: top-left corner plus size, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }

    /// Grow the box by `margin` pixels on every side.
    pub fn expand(&self, margin: i32) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.width + 2 * margin,
            self.height + 2 * margin,
        )
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BoundingBox) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(x, y, right - x, bottom - y)
    }

    /// Move the box by whole pixels.
    pub fn translate(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Intersection with an image of the given size, or `None` if they do not overlap.
    pub fn clip(&self, width: usize, height: usize) -> Option<Self> {
        let x0 = self.x.max(0);
        let y0 = self.y.max(0);
        let x1 = self.right().min(width as i32);
        let y1 = self.bottom().min(height as i32);
        if x1 <= x0 || y1 <= y0 {
            None
        } else {
            Some(Self::new(x0, y0, x1 - x0, y1 - y0))
        }
    }

    /// True when the box lies completely inside an image of the given size.
    pub fn fits_within(&self, width: usize, height: usize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.width > 0
            && self.height > 0
            && self.right() <= width as i32
            && self.bottom() <= height as i32
    }
}
