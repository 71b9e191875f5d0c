use std::cell::RefCell;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use tempfile::TempDir;

use sunspot_core::acquisition::{
    download_series, AcquisitionRequest, Archive, HttpArchive, Instrument, RemoteFile,
};
use sunspot_core::config::AcquisitionConfig;
use sunspot_core::error::{Result, SunspotError};
use sunspot_core::progress::NoOpReporter;

/// Archive that serves one tiny file per sample time and counts calls.
#[derive(Default)]
struct FakeArchive {
    searches: RefCell<usize>,
    fetched: RefCell<Vec<String>>,
    empty: bool,
}

impl Archive for FakeArchive {
    fn search(&self, request: &AcquisitionRequest) -> Result<Vec<RemoteFile>> {
        *self.searches.borrow_mut() += 1;
        if self.empty {
            return Ok(Vec::new());
        }
        Ok(request
            .sample_times()
            .into_iter()
            .map(|time| RemoteFile {
                url: format!("fake://{}", time.format("%H%M")),
                file_name: format!("{}_{}.fits", request.instrument, time.format("%Y%m%d_%H%M%S")),
                time,
            })
            .collect())
    }

    fn fetch(&self, file: &RemoteFile, dest: &Path) -> Result<()> {
        self.fetched.borrow_mut().push(file.file_name.clone());
        fs::write(dest, file.url.as_bytes())?;
        Ok(())
    }
}

fn request() -> AcquisitionRequest {
    AcquisitionRequest::parse("2024-05-01 00:00:00", "2024-05-01 04:00:00", "HMI", 2).unwrap()
}

#[test]
fn test_unknown_instrument_is_rejected_before_search() {
    let archive = FakeArchive::default();
    let err =
        AcquisitionRequest::parse("2024-05-01 00:00:00", "2024-05-01 04:00:00", "xrt9", 1)
            .unwrap_err();

    match &err {
        SunspotError::InvalidParameter(msg) => {
            assert!(msg.contains("xrt9"), "{msg}");
            assert!(msg.contains("hmi"), "{msg}");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(*archive.searches.borrow(), 0);
}

#[test]
fn test_invalid_time_ranges() {
    for (start, end) in [
        ("2024-05-01", "2024-05-02 00:00:00"),
        ("2024-05-01 00:00:00", "not a time"),
        ("2024-05-01 04:00:00", "2024-05-01 04:00:00"),
        ("2024-05-01 05:00:00", "2024-05-01 04:00:00"),
    ] {
        let result = AcquisitionRequest::parse(start, end, "hmi", 1);
        assert!(
            matches!(result, Err(SunspotError::InvalidParameter(_))),
            "{start} .. {end}"
        );
    }
    assert!(AcquisitionRequest::parse("2024-05-01 00:00:00", "2024-05-01 01:00:00", "hmi", 0).is_err());
}

#[test]
fn test_instrument_names() {
    assert_eq!(" Aia ".parse::<Instrument>().unwrap(), Instrument::Aia);
    assert_eq!(Instrument::default(), Instrument::Hmi);
    assert_eq!(Instrument::Gong.to_string(), "gong");
}

#[test]
fn test_sample_times_include_end() {
    let times = request().sample_times();
    let hours: Vec<u32> = times
        .iter()
        .map(|t| chrono::Timelike::hour(t))
        .collect();
    assert_eq!(hours, vec![0, 2, 4]);
}

#[test]
fn test_download_creates_consecutive_series() {
    let root = TempDir::new().unwrap();
    let archive = FakeArchive::default();

    let (first, paths) = download_series(root.path(), &request(), &archive, &NoOpReporter).unwrap();
    assert_eq!(first.index(), 1);
    assert!(first.dir().ends_with("TR_01"));
    assert_eq!(paths.len(), 3);
    assert!(paths.iter().all(|p| p.is_file()));

    let names = first.read_manifest().unwrap();
    assert_eq!(
        names,
        vec![
            "hmi_20240501_000000.fits",
            "hmi_20240501_020000.fits",
            "hmi_20240501_040000.fits"
        ]
    );

    let (second, _) = download_series(root.path(), &request(), &archive, &NoOpReporter).unwrap();
    assert_eq!(second.index(), 2);
    assert!(root.path().join("TR_02").join("names.txt").is_file());
    assert_eq!(archive.fetched.borrow().len(), 6);
}

#[test]
fn test_empty_search_creates_nothing() {
    let root = TempDir::new().unwrap();
    let archive = FakeArchive {
        empty: true,
        ..Default::default()
    };

    let result = download_series(root.path(), &request(), &archive, &NoOpReporter);
    assert!(matches!(result, Err(SunspotError::EmptyResult(_))));
    assert!(!root.path().join("TR_01").exists());
}

#[test]
fn test_http_archive_requires_template() {
    let config = AcquisitionConfig::default();
    assert!(matches!(
        HttpArchive::from_config(&config),
        Err(SunspotError::InvalidParameter(_))
    ));

    let blank = AcquisitionConfig {
        url_template: Some("  ".into()),
        ..Default::default()
    };
    assert!(HttpArchive::from_config(&blank).is_err());
}

#[test]
fn test_url_template_expansion() {
    let archive = HttpArchive::new(
        "https://archive.test/{instrument}/{date}/{year}{month}{day}_{hour}{minute}{second}.fits",
    );
    let time = NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(7, 5, 9)
        .unwrap();
    assert_eq!(
        archive.url_for(Instrument::Aia, &time),
        "https://archive.test/aia/2024/05/01/20240501_070509.fits"
    );

    let files = HttpArchive::new("https://archive.test/{timestamp}.fits?x=1")
        .search(&request())
        .unwrap();
    assert_eq!(files.len(), 3);
    assert_eq!(files[1].file_name, "20240501_020000.fits");
}
