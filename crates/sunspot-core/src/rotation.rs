//! Heliographic conversion of tracked displacements and the differential
//! rotation fit `omega(B) = a + b * sin^2(B)`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::consts::EPSILON;
use crate::error::{Result, SunspotError};
use crate::io::fits::{FitsFile, Hdu};
use crate::series::Series;
use crate::store::DisplacementRecord;

/// Viewing geometry of one image.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observer {
    /// Heliographic latitude of the disk center (B0), degrees.
    pub b0_deg: f64,
    /// Carrington longitude of the disk center (L0), degrees.
    pub l0_deg: f64,
    /// Rotation of the image axes relative to solar north, degrees.
    pub crota2_deg: f64,
    /// Apparent solar radius, arcsec.
    pub rsun_arcsec: f64,
    /// Pixel scale, arcsec per pixel.
    pub cdelt1: f64,
    pub cdelt2: f64,
    /// Disk center reference pixel (1-based, FITS convention).
    pub crpix1: f64,
    pub crpix2: f64,
}

impl Observer {
    pub fn from_hdu(hdu: &mut Hdu<'_>) -> Result<Self> {
        Ok(Self {
            b0_deg: hdu.image_f64("CRLT_OBS")?,
            l0_deg: hdu.image_f64("CRLN_OBS")?,
            crota2_deg: hdu.optional_f64("CROTA2")?.unwrap_or(0.0),
            rsun_arcsec: hdu.image_f64("RSUN_OBS")?,
            cdelt1: hdu.image_f64("CDELT1")?,
            cdelt2: hdu.image_f64("CDELT2")?,
            crpix1: hdu.image_f64("CRPIX1")?,
            crpix2: hdu.image_f64("CRPIX2")?,
        })
    }

    pub fn from_file(path: &Path, hdu_index: usize) -> Result<Self> {
        let mut fits = FitsFile::open(path)?;
        let mut hdu = fits.hdu(hdu_index)?;
        Self::from_hdu(&mut hdu)
    }

    /// Heliographic position of a 0-based pixel, or `None` off the disk.
    pub fn pixel_to_heliographic(&self, x: f64, y: f64) -> Option<Heliographic> {
        let dx = x - (self.crpix1 - 1.0);
        let dy = y - (self.crpix2 - 1.0);
        let (sin_r, cos_r) = self.crota2_deg.to_radians().sin_cos();

        // Plane-of-sky offsets in units of the solar radius.
        let px = self.cdelt1 * (cos_r * dx - sin_r * dy) / self.rsun_arcsec;
        let py = self.cdelt2 * (sin_r * dx + cos_r * dy) / self.rsun_arcsec;
        let rho2 = px * px + py * py;
        if rho2 > 1.0 {
            return None;
        }
        let pz = (1.0 - rho2).sqrt();

        let (sin_b0, cos_b0) = self.b0_deg.to_radians().sin_cos();
        let lat = (py * cos_b0 + pz * sin_b0).clamp(-1.0, 1.0).asin();
        let lon = self.l0_deg.to_radians() + px.atan2(pz * cos_b0 - py * sin_b0);

        Some(Heliographic {
            lat_deg: lat.to_degrees(),
            lon_deg: lon.to_degrees().rem_euclid(360.0),
        })
    }
}

/// Carrington heliographic coordinates, degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Heliographic {
    pub lat_deg: f64,
    pub lon_deg: f64,
}

impl Heliographic {
    /// Great-circle separation in degrees.
    pub fn separation(&self, other: &Heliographic) -> f64 {
        let (lat1, lat2) = (self.lat_deg.to_radians(), other.lat_deg.to_radians());
        let dlat = lat2 - lat1;
        let dlon = (other.lon_deg - self.lon_deg).to_radians();
        let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        (2.0 * h.sqrt().clamp(0.0, 1.0).asin()).to_degrees()
    }
}

/// Angular velocity of one tracked spot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RotationSample {
    /// Latitude of the start point, degrees.
    pub latitude_deg: f64,
    /// Degrees per day.
    pub omega_deg_per_day: f64,
    /// Synodic period in days (`360 / omega`).
    pub period_days: f64,
}

/// Angular velocity and period from a separation (degrees) over `delta_t_hours`.
pub fn omega_and_period(separation_deg: f64, delta_t_hours: f64) -> Result<(f64, f64)> {
    if delta_t_hours <= 0.0 {
        return Err(SunspotError::InvalidParameter(format!(
            "Time difference must be positive, got {delta_t_hours} h"
        )));
    }
    let omega = separation_deg / (delta_t_hours / 24.0);
    let period = if omega.abs() > EPSILON {
        360.0 / omega
    } else {
        f64::INFINITY
    };
    Ok((omega, period))
}

/// Convert displacement records into rotation samples. Both points of every
/// record use the same observer.
pub fn samples_from_records(
    records: &[DisplacementRecord],
    observer: &Observer,
    cadence_hours: f64,
) -> Result<Vec<RotationSample>> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let start = observer.pixel_to_heliographic(r.x1, r.y1);
            let end = observer.pixel_to_heliographic(r.x2, r.y2);
            let (Some(start), Some(end)) = (start, end) else {
                return Err(SunspotError::InvalidParameter(format!(
                    "Record {} lies outside the solar disk",
                    i + 1
                )));
            };
            let (omega, period) =
                omega_and_period(start.separation(&end), r.frame_span * cadence_hours)?;
            Ok(RotationSample {
                latitude_deg: start.lat_deg,
                omega_deg_per_day: omega,
                period_days: period,
            })
        })
        .collect()
}

/// Least-squares fit of `omega = a + b * sin^2(latitude)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RotationFit {
    /// Equatorial angular velocity, degrees per day.
    pub a: f64,
    /// Latitude gradient, degrees per day.
    pub b: f64,
    pub r_squared: f64,
    pub samples: usize,
}

impl RotationFit {
    pub fn omega_at(&self, latitude_deg: f64) -> f64 {
        self.a + self.b * latitude_deg.to_radians().sin().powi(2)
    }
}

pub fn fit_differential_rotation(latitudes_deg: &[f64], omegas: &[f64]) -> Result<RotationFit> {
    if latitudes_deg.len() != omegas.len() {
        return Err(SunspotError::InvalidParameter(format!(
            "{} latitudes but {} angular velocities",
            latitudes_deg.len(),
            omegas.len()
        )));
    }
    let n = latitudes_deg.len();
    if n == 0 {
        return Err(SunspotError::EmptyResult(
            "No rotation samples to fit".into(),
        ));
    }
    if n < 2 {
        return Err(SunspotError::InvalidParameter(format!(
            "At least 2 samples are needed for a fit, got {n}"
        )));
    }

    let xs: Vec<f64> = latitudes_deg
        .iter()
        .map(|lat| lat.to_radians().sin().powi(2))
        .collect();
    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = omegas.iter().sum::<f64>() / n as f64;

    let sxx: f64 = xs.iter().map(|x| (x - mean_x).powi(2)).sum();
    if sxx <= EPSILON {
        return Err(SunspotError::InvalidParameter(
            "All samples share one latitude, the fit is undetermined".into(),
        ));
    }
    let sxy: f64 = xs
        .iter()
        .zip(omegas)
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum();

    let b = sxy / sxx;
    let a = mean_y - b * mean_x;

    let ss_res: f64 = xs
        .iter()
        .zip(omegas)
        .map(|(x, y)| (y - (a + b * x)).powi(2))
        .sum();
    let ss_tot: f64 = omegas.iter().map(|y| (y - mean_y).powi(2)).sum();
    let r_squared = if ss_tot > EPSILON {
        1.0 - ss_res / ss_tot
    } else {
        1.0
    };

    debug!(a, b, r_squared, samples = n, "Fitted differential rotation");
    Ok(RotationFit {
        a,
        b,
        r_squared,
        samples: n,
    })
}

/// Rotation samples for every record of a series, using the observer of the
/// series' first frame.
pub fn analyze_series(
    series: &Series,
    hdu_index: usize,
    cadence_hours: f64,
) -> Result<Vec<RotationSample>> {
    let records = series.store().read()?;
    if records.is_empty() {
        return Ok(Vec::new());
    }
    let paths = series.frame_paths()?;
    let observer = Observer::from_file(&paths[0], hdu_index)?;
    let samples = samples_from_records(&records, &observer, cadence_hours)?;
    info!(
        series = series.index(),
        samples = samples.len(),
        "Converted displacements to rotation samples"
    );
    Ok(samples)
}

/// Fit the rotation law to a set of samples.
pub fn fit_samples(samples: &[RotationSample]) -> Result<RotationFit> {
    let lats: Vec<f64> = samples.iter().map(|s| s.latitude_deg).collect();
    let omegas: Vec<f64> = samples.iter().map(|s| s.omega_deg_per_day).collect();
    fit_differential_rotation(&lats, &omegas)
}
