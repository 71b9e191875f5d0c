use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SunspotError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Empty result: {0}")]
    EmptyResult(String),

    #[error("Frame {index} is {found_width}x{found_height}, series geometry is {width}x{height}")]
    GeometryMismatch {
        index: usize,
        width: usize,
        height: usize,
        found_width: usize,
        found_height: usize,
    },

    #[error("Invalid FITS file: {0}")]
    InvalidFits(String),

    #[error("Unsupported FITS content: {0}")]
    UnsupportedFits(String),

    #[error("FITS error: {0}")]
    Fits(#[from] fitsio::errors::Error),

    #[error("Header keyword '{key}' not found in HDU {hdu}")]
    MissingHeaderKey { key: String, hdu: usize },

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Table error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Network error: {0}")]
    Network(String),
}

pub type Result<T> = std::result::Result<T, SunspotError>;

impl SunspotError {
    /// `NotFound` for `path`.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }
}
