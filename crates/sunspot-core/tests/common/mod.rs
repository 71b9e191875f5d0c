#![allow(dead_code)]

use std::path::{Path, PathBuf};

use fitsio::hdu::FitsHdu;
use fitsio::images::{ImageDescription, ImageType};
use fitsio::FitsFile;
use ndarray::Array2;

use sunspot_core::detection::GroupedSpot;
use sunspot_core::frame::{BoundingBox, Frame, Point};
use sunspot_core::geometry::CalibrationGeometry;

/// Header keyword value written into a fixture.
pub enum Value<'a> {
    Int(i64),
    Float(f64),
    Text(&'a str),
}

pub struct Keyword<'a> {
    pub key: &'a str,
    pub value: Value<'a>,
}

pub fn keyword<'a>(key: &'a str, value: Value<'a>) -> Keyword<'a> {
    Keyword { key, value }
}

fn write_keywords(fptr: &mut FitsFile, hdu: &FitsHdu, keywords: &[Keyword<'_>]) {
    for kw in keywords {
        match kw.value {
            Value::Int(v) => hdu.write_key(fptr, kw.key, v),
            Value::Float(v) => hdu.write_key(fptr, kw.key, v),
            Value::Text(v) => hdu.write_key(fptr, kw.key, v),
        }
        .expect("write keyword");
    }
}

/// FITS file with an empty primary HDU and one float32 image extension (HDU 1).
pub fn write_float_image_fits(path: &Path, image: &Array2<f32>, keywords: &[Keyword<'_>]) -> PathBuf {
    let (h, w) = image.dim();
    let mut fptr = FitsFile::create(path).open().expect("create fixture");
    let description = ImageDescription {
        data_type: ImageType::Float,
        dimensions: &[h, w],
    };
    let hdu = fptr
        .create_image("IMAGE".to_string(), &description)
        .expect("create image HDU");
    let pixels: Vec<f32> = image.iter().copied().collect();
    hdu.write_image(&mut fptr, &pixels).expect("write pixels");
    write_keywords(&mut fptr, &hdu, keywords);
    path.to_path_buf()
}

/// Single-HDU FITS file with a 16-bit integer primary image.
///
/// Keywords are written after the pixels, so scaling keywords apply on read only.
pub fn write_i16_primary_fits(path: &Path, image: &Array2<i16>, keywords: &[Keyword<'_>]) -> PathBuf {
    let (h, w) = image.dim();
    let description = ImageDescription {
        data_type: ImageType::Short,
        dimensions: &[h, w],
    };
    let mut fptr = FitsFile::create(path)
        .with_custom_primary(&description)
        .open()
        .expect("create fixture");
    let hdu = fptr.primary_hdu().expect("primary HDU");
    let pixels: Vec<i16> = image.iter().copied().collect();
    hdu.write_image(&mut fptr, &pixels).expect("write pixels");
    write_keywords(&mut fptr, &hdu, keywords);
    path.to_path_buf()
}

/// Calibration keywords for a disk of `radius` pixels centered on the 1-based
/// reference pixel (`crpix1`, `crpix2`).
pub fn solar_keywords(crpix1: f64, crpix2: f64, radius: f64) -> Vec<Keyword<'static>> {
    let cdelt = 0.5;
    vec![
        keyword("CDELT1", Value::Float(cdelt)),
        keyword("CDELT2", Value::Float(cdelt)),
        keyword("CRPIX1", Value::Float(crpix1)),
        keyword("CRPIX2", Value::Float(crpix2)),
        keyword("RSUN_OBS", Value::Float(radius * cdelt)),
        keyword("CRLT_OBS", Value::Float(0.0)),
        keyword("CRLN_OBS", Value::Float(180.0)),
        keyword("CROTA2", Value::Float(0.0)),
    ]
}

/// Light background with dark disks, as (center_x, center_y, radius).
pub fn disk_image(width: usize, height: usize, disks: &[(f64, f64, f64)]) -> Array2<u8> {
    Array2::from_shape_fn((height, width), |(row, col)| {
        let dark = disks.iter().any(|&(cx, cy, r)| {
            let dx = col as f64 - cx;
            let dy = row as f64 - cy;
            dx * dx + dy * dy <= r * r
        });
        if dark {
            0
        } else {
            255
        }
    })
}

pub fn disk_frame(width: usize, height: usize, disks: &[(f64, f64, f64)], index: usize) -> Frame {
    Frame::new(disk_image(width, height, disks), index)
}

/// The same image as raw float data, for writing FITS fixtures.
pub fn disk_image_f32(width: usize, height: usize, disks: &[(f64, f64, f64)]) -> Array2<f32> {
    disk_image(width, height, disks).mapv(|v| v as f32 * 40.0 + 1000.0)
}

pub fn geometry(center: (i32, i32), radius: i32, resolution: i32) -> CalibrationGeometry {
    CalibrationGeometry {
        disk_radius_px: radius,
        disk_center_px: center,
        resolution,
    }
}

/// Spot covering a disk of radius `r` at (`cx`, `cy`).
pub fn spot_at(cx: i32, cy: i32, r: i32) -> GroupedSpot {
    GroupedSpot {
        bbox: BoundingBox::new(cx - r, cy - r, 2 * r + 1, 2 * r + 1),
        centroid: Point::new(cx as f64, cy as f64),
        members: 1,
    }
}
