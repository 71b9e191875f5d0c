mod common;

use approx::assert_relative_eq;
use ndarray::Array2;
use tempfile::TempDir;

use common::{keyword, write_float_image_fits, write_i16_primary_fits, Value};
use sunspot_core::error::SunspotError;
use sunspot_core::io::fits::FitsFile;

#[test]
fn test_read_float_image_extension() {
    let dir = TempDir::new().unwrap();
    let mut image = Array2::from_shape_fn((4, 6), |(r, c)| (r * 10 + c) as f32);
    image[[2, 3]] = f32::NAN;
    let path = write_float_image_fits(
        &dir.path().join("image.fits"),
        &image,
        &[keyword("CRPIX1", Value::Float(3.5))],
    );

    let mut fits = FitsFile::open(&path).unwrap();
    assert_eq!(fits.hdu_count(), 2);

    let mut hdu = fits.hdu(1).unwrap();
    assert_eq!(hdu.image_shape().unwrap(), (4, 6));
    assert_eq!(hdu.image_f64("NAXIS1").unwrap(), 6.0);
    assert_eq!(hdu.image_f64("NAXIS2").unwrap(), 4.0);
    assert_eq!(hdu.image_f64("CRPIX1").unwrap(), 3.5);

    let read = fits.read_image(1).unwrap();
    assert_eq!(read.dim(), (4, 6));
    assert_eq!(read[[0, 0]], 0.0);
    assert_eq!(read[[3, 5]], 35.0);
    assert_eq!(read[[1, 4]], 14.0);
    assert!(read[[2, 3]].is_nan());
}

#[test]
fn test_integer_image_is_scaled() {
    let dir = TempDir::new().unwrap();
    let image = Array2::from_shape_fn((3, 3), |(r, c)| (r * 3 + c) as i16);
    let path = write_i16_primary_fits(
        &dir.path().join("int.fits"),
        &image,
        &[
            keyword("BSCALE", Value::Float(2.0)),
            keyword("BZERO", Value::Float(100.0)),
        ],
    );

    let read = FitsFile::open(&path).unwrap().read_image(0).unwrap();
    assert_eq!(read.dim(), (3, 3));
    assert_relative_eq!(read[[0, 0]], 100.0);
    assert_relative_eq!(read[[1, 2]], 110.0);
    assert_relative_eq!(read[[2, 2]], 116.0);
}

#[test]
fn test_missing_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.fits");
    match FitsFile::open(&path) {
        Err(SunspotError::NotFound { path: p }) => assert_eq!(p, path),
        other => panic!("expected NotFound, got {:?}", other.err()),
    }
}

#[test]
fn test_missing_keyword_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = write_float_image_fits(&dir.path().join("bare.fits"), &Array2::zeros((2, 2)), &[]);

    let mut fits = FitsFile::open(&path).unwrap();
    let mut hdu = fits.hdu(1).unwrap();
    match hdu.image_f64("RSUN_OBS") {
        Err(SunspotError::MissingHeaderKey { key, hdu }) => {
            assert_eq!(key, "RSUN_OBS");
            assert_eq!(hdu, 1);
        }
        other => panic!("expected MissingHeaderKey, got {other:?}"),
    }
    assert_eq!(hdu.optional_f64("CROTA2").unwrap(), None);
}

#[test]
fn test_optional_keyword_present() {
    let dir = TempDir::new().unwrap();
    let path = write_float_image_fits(
        &dir.path().join("rot.fits"),
        &Array2::zeros((2, 2)),
        &[keyword("CROTA2", Value::Float(-0.25))],
    );

    let mut fits = FitsFile::open(&path).unwrap();
    let mut hdu = fits.hdu(1).unwrap();
    assert_eq!(hdu.optional_f64("CROTA2").unwrap(), Some(-0.25));
}

#[test]
fn test_absent_hdu_is_invalid() {
    let dir = TempDir::new().unwrap();
    let path = write_float_image_fits(&dir.path().join("one.fits"), &Array2::zeros((2, 2)), &[]);

    let mut fits = FitsFile::open(&path).unwrap();
    assert!(matches!(fits.hdu(5), Err(SunspotError::InvalidFits(_))));
    assert!(matches!(fits.read_image(5), Err(SunspotError::InvalidFits(_))));
}

#[test]
fn test_empty_primary_has_no_image() {
    let dir = TempDir::new().unwrap();
    let path = write_float_image_fits(&dir.path().join("ext.fits"), &Array2::zeros((2, 2)), &[]);

    let result = FitsFile::open(&path).unwrap().read_image(0);
    assert!(matches!(result, Err(SunspotError::UnsupportedFits(_))));
}
