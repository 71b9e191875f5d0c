//! FITS access through cfitsio.
//!
//! Tile-compressed images are decompressed by cfitsio and show up as plain
//! images, so callers never see the BINTABLE that stores them.

use std::path::{Path, PathBuf};

use fitsio::errors::Error as FitsioError;
use fitsio::hdu::{FitsHdu, HduInfo};
use ndarray::Array2;
use tracing::debug;

use crate::error::{Result, SunspotError};

/// cfitsio status for a keyword absent from the header.
const KEY_NO_EXIST: i32 = 202;

/// An open FITS file.
pub struct FitsFile {
    inner: fitsio::FitsFile,
    path: PathBuf,
}

impl FitsFile {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(SunspotError::not_found(path));
        }
        let inner = fitsio::FitsFile::open(path)?;
        debug!(path = %path.display(), "Opened FITS file");

        Ok(Self {
            inner,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of HDUs, counted by walking them in order.
    pub fn hdu_count(&mut self) -> usize {
        let mut count = 0;
        while self.inner.hdu(count).is_ok() {
            count += 1;
        }
        count
    }

    pub fn hdu(&mut self, index: usize) -> Result<Hdu<'_>> {
        let hdu = self.inner.hdu(index).map_err(|e| {
            SunspotError::InvalidFits(format!(
                "{}: HDU {index} is not available ({e})",
                self.path.display()
            ))
        })?;
        Ok(Hdu {
            index,
            file: &mut self.inner,
            hdu,
        })
    }

    /// Read the 2-D image of an HDU as physical values (`BSCALE`/`BZERO` applied).
    pub fn read_image(&mut self, index: usize) -> Result<Array2<f32>> {
        self.hdu(index)?.read_image()
    }
}

/// One header/data unit of an open file.
pub struct Hdu<'a> {
    index: usize,
    file: &'a mut fitsio::FitsFile,
    hdu: FitsHdu,
}

impl Hdu<'_> {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Image size as (rows, columns). Leading axes of length one are dropped.
    pub fn image_shape(&self) -> Result<(usize, usize)> {
        let HduInfo::ImageInfo { shape, .. } = &self.hdu.info else {
            return Err(SunspotError::UnsupportedFits(format!(
                "HDU {} does not hold an image",
                self.index
            )));
        };
        match shape.as_slice() {
            [leading @ .., rows, cols] if leading.iter().all(|&n| n == 1) => Ok((*rows, *cols)),
            other => Err(SunspotError::UnsupportedFits(format!(
                "HDU {} has image shape {other:?}, expected 2-D",
                self.index
            ))),
        }
    }

    /// Numeric keyword with image semantics.
    ///
    /// `NAXIS1` and `NAXIS2` are answered from the image shape, which for a
    /// compressed HDU is the uncompressed size rather than the table layout.
    pub fn image_f64(&mut self, key: &str) -> Result<f64> {
        match key {
            "NAXIS1" => return Ok(self.image_shape()?.1 as f64),
            "NAXIS2" => return Ok(self.image_shape()?.0 as f64),
            _ => {}
        }
        self.hdu
            .read_key::<f64>(&mut *self.file, key)
            .map_err(|e| missing_key_or(e, key, self.index))
    }

    /// Like [`Hdu::image_f64`], with `None` for an absent keyword.
    pub fn optional_f64(&mut self, key: &str) -> Result<Option<f64>> {
        match self.image_f64(key) {
            Ok(value) => Ok(Some(value)),
            Err(SunspotError::MissingHeaderKey { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn read_image(&mut self) -> Result<Array2<f32>> {
        let shape = self.image_shape()?;
        let pixels: Vec<f32> = self.hdu.read_image(&mut *self.file)?;
        Array2::from_shape_vec(shape, pixels).map_err(|e| {
            SunspotError::InvalidFits(format!("HDU {} pixel count: {e}", self.index))
        })
    }
}

fn missing_key_or(err: FitsioError, key: &str, hdu: usize) -> SunspotError {
    match err {
        FitsioError::Fits(ref fits) if fits.status == KEY_NO_EXIST => {
            SunspotError::MissingHeaderKey {
                key: key.to_string(),
                hdu,
            }
        }
        other => other.into(),
    }
}
