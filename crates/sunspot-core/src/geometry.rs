use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::frame::Point;
use crate::io::fits::{FitsFile, Hdu};

/// Pixel-space description of the solar disk, shared by every frame of a series.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationGeometry {
    /// Disk radius in pixels (`RSUN_OBS / CDELT1`, truncated).
    pub disk_radius_px: i32,
    /// Disk center pixel (`CRPIX1`, `CRPIX2`, truncated).
    pub disk_center_px: (i32, i32),
    /// Image resolution along the second axis (`NAXIS2`).
    pub resolution: i32,
}

impl CalibrationGeometry {
    pub fn center(&self) -> Point {
        Point::new(self.disk_center_px.0 as f64, self.disk_center_px.1 as f64)
    }

    pub fn radius(&self) -> f64 {
        self.disk_radius_px as f64
    }
}

/// Read the calibration geometry of one image.
///
/// Fails with `NotFound` when `path` does not exist. Keywords are not
/// validated beyond lookup; a missing one surfaces as `MissingHeaderKey`.
pub fn extract_geometry(path: &Path, hdu_index: usize) -> Result<CalibrationGeometry> {
    let mut fits = FitsFile::open(path)?;
    let geometry = geometry_from_hdu(&mut fits.hdu(hdu_index)?)?;
    debug!(
        path = %path.display(),
        radius = geometry.disk_radius_px,
        center_x = geometry.disk_center_px.0,
        center_y = geometry.disk_center_px.1,
        resolution = geometry.resolution,
        "Extracted disk geometry"
    );
    Ok(geometry)
}

/// `NAXIS2` comes from the image shape, so compressed HDUs report the image rows.
pub fn geometry_from_hdu(hdu: &mut Hdu<'_>) -> Result<CalibrationGeometry> {
    let rsun_obs = hdu.image_f64("RSUN_OBS")?;
    let cdelt1 = hdu.image_f64("CDELT1")?;
    let crpix1 = hdu.image_f64("CRPIX1")?;
    let crpix2 = hdu.image_f64("CRPIX2")?;
    let naxis2 = hdu.image_f64("NAXIS2")?;

    Ok(CalibrationGeometry {
        disk_radius_px: (rsun_obs / cdelt1) as i32,
        disk_center_px: (crpix1 as i32, crpix2 as i32),
        resolution: naxis2 as i32,
    })
}
