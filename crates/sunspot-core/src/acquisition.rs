use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::AcquisitionConfig;
use crate::consts::ACQUISITION_TIME_FORMAT;
use crate::error::{Result, SunspotError};
use crate::progress::{ProgressReporter, Stage};
use crate::series::Series;

/// Instruments the archive can be queried for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instrument {
    /// SDO Helioseismic and Magnetic Imager (continuum intensity).
    #[default]
    Hmi,
    Aia,
    Mdi,
    Eit,
    Gong,
}

impl Instrument {
    pub const ALL: [Instrument; 5] = [Self::Hmi, Self::Aia, Self::Mdi, Self::Eit, Self::Gong];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hmi => "hmi",
            Self::Aia => "aia",
            Self::Mdi => "mdi",
            Self::Eit => "eit",
            Self::Gong => "gong",
        }
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Instrument {
    type Err = SunspotError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|i| i.as_str() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|i| i.as_str()).collect();
                SunspotError::InvalidParameter(format!(
                    "Unknown instrument '{s}', expected one of: {}",
                    known.join(", ")
                ))
            })
    }
}

/// A validated time-range query.
#[derive(Clone, Debug, PartialEq)]
pub struct AcquisitionRequest {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub instrument: Instrument,
    /// Hours between samples.
    pub sample_hours: u32,
}

impl AcquisitionRequest {
    /// Validate user input. Nothing here touches the network.
    pub fn parse(start: &str, end: &str, instrument: &str, sample_hours: u32) -> Result<Self> {
        let instrument = Instrument::from_str(instrument)?;
        let start = parse_time(start)?;
        let end = parse_time(end)?;
        if end <= start {
            return Err(SunspotError::InvalidParameter(format!(
                "End time {end} is not after start time {start}"
            )));
        }
        if sample_hours == 0 {
            return Err(SunspotError::InvalidParameter(
                "Sample interval must be at least one hour".into(),
            ));
        }
        Ok(Self {
            start,
            end,
            instrument,
            sample_hours,
        })
    }

    /// Sample instants from `start` up to and including `end`.
    pub fn sample_times(&self) -> Vec<NaiveDateTime> {
        let step = Duration::hours(self.sample_hours as i64);
        std::iter::successors(Some(self.start), |t| Some(*t + step))
            .take_while(|t| *t <= self.end)
            .collect()
    }
}

fn parse_time(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), ACQUISITION_TIME_FORMAT).map_err(|e| {
        SunspotError::InvalidParameter(format!(
            "Invalid time '{value}' ({e}), expected YYYY-MM-DD HH:MM:SS"
        ))
    })
}

/// One file offered by an archive.
#[derive(Clone, Debug, PartialEq)]
pub struct RemoteFile {
    pub url: String,
    pub file_name: String,
    pub time: NaiveDateTime,
}

/// Source of series images.
pub trait Archive {
    fn search(&self, request: &AcquisitionRequest) -> Result<Vec<RemoteFile>>;

    /// Download `file` to `dest`.
    fn fetch(&self, file: &RemoteFile, dest: &Path) -> Result<()>;
}

/// Archive addressed by a URL template with one URL per sample time.
#[derive(Clone, Debug)]
pub struct HttpArchive {
    url_template: String,
}

impl HttpArchive {
    pub fn new(url_template: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
        }
    }

    pub fn from_config(config: &AcquisitionConfig) -> Result<Self> {
        config
            .url_template
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .map(Self::new)
            .ok_or_else(|| {
                SunspotError::InvalidParameter(
                    "No archive configured: set acquisition.url_template".into(),
                )
            })
    }

    pub fn url_for(&self, instrument: Instrument, time: &NaiveDateTime) -> String {
        expand_template(&self.url_template, instrument, time)
    }
}

impl Archive for HttpArchive {
    fn search(&self, request: &AcquisitionRequest) -> Result<Vec<RemoteFile>> {
        Ok(request
            .sample_times()
            .into_iter()
            .map(|time| {
                let url = self.url_for(request.instrument, &time);
                let file_name = file_name_from_url(&url).unwrap_or_else(|| {
                    format!(
                        "{}_{}.fits",
                        request.instrument,
                        time.format("%Y%m%d_%H%M%S")
                    )
                });
                RemoteFile {
                    url,
                    file_name,
                    time,
                }
            })
            .collect())
    }

    fn fetch(&self, file: &RemoteFile, dest: &Path) -> Result<()> {
        let response = ureq::get(&file.url)
            .call()
            .map_err(|e: ureq::Error| SunspotError::Network(format!("{}: {e}", file.url)))?;

        if !response.status().is_success() {
            return Err(SunspotError::Network(format!(
                "{}: HTTP status {}",
                file.url,
                response.status()
            )));
        }

        let mut reader = response.into_body().into_reader();
        let mut out = File::create(dest)?;
        let bytes = io::copy(&mut reader, &mut out)?;
        debug!(url = %file.url, bytes, "Fetched file");
        Ok(())
    }
}

fn expand_template(template: &str, instrument: Instrument, time: &NaiveDateTime) -> String {
    template
        .replace("{instrument}", instrument.as_str())
        .replace("{date}", &time.format("%Y/%m/%d").to_string())
        .replace("{timestamp}", &time.format("%Y%m%d_%H%M%S").to_string())
        .replace("{year}", &format!("{:04}", time.year()))
        .replace("{month}", &format!("{:02}", time.month()))
        .replace("{day}", &format!("{:02}", time.day()))
        .replace("{hour}", &format!("{:02}", time.hour()))
        .replace("{minute}", &format!("{:02}", time.minute()))
        .replace("{second}", &format!("{:02}", time.second()))
}

fn file_name_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next()?;
    let name = path.rsplit('/').next()?;
    (!name.is_empty()).then(|| name.to_string())
}

/// Download a new series into the next free `TR_XX` directory under `root`.
///
/// Writes the manifest and returns the series with the local file paths.
pub fn download_series(
    root: &Path,
    request: &AcquisitionRequest,
    archive: &dyn Archive,
    progress: &dyn ProgressReporter,
) -> Result<(Series, Vec<PathBuf>)> {
    let files = archive.search(request)?;
    if files.is_empty() {
        return Err(SunspotError::EmptyResult(format!(
            "Archive returned no {} images between {} and {}",
            request.instrument, request.start, request.end
        )));
    }

    let series = Series::create_next(root)?;
    progress.begin_stage(Stage::Downloading, Some(files.len()));

    let mut paths = Vec::with_capacity(files.len());
    let mut names = Vec::with_capacity(files.len());
    for (i, file) in files.iter().enumerate() {
        let dest = series.dir().join(&file.file_name);
        archive.fetch(file, &dest)?;
        paths.push(dest);
        names.push(file.file_name.clone());
        progress.advance(i + 1);
    }
    progress.finish_stage();

    series.write_manifest(&names)?;
    info!(
        series = series.index(),
        files = paths.len(),
        instrument = %request.instrument,
        "Downloaded series"
    );
    Ok((series, paths))
}
