use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::acquisition::Instrument;
use crate::consts::{DEFAULT_CADENCE_HOURS, DEFAULT_DATA_HDU, DEFAULT_DATA_ROOT};
use crate::detection::DetectionConfig;
use crate::tracking::TrackingConfig;

/// Where calibration data lives inside each image file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FitsConfig {
    /// HDU holding the image and its calibration header.
    #[serde(default = "default_data_hdu")]
    pub data_hdu: usize,
}

fn default_data_hdu() -> usize {
    DEFAULT_DATA_HDU
}

impl Default for FitsConfig {
    fn default() -> Self {
        Self {
            data_hdu: DEFAULT_DATA_HDU,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AcquisitionConfig {
    /// Archive URL for one image. Placeholders: `{instrument}`, `{date}`
    /// (`YYYY/MM/DD`), `{timestamp}` (`YYYYMMDD_HHMMSS`), `{year}`, `{month}`,
    /// `{day}`, `{hour}`, `{minute}`, `{second}`.
    #[serde(default)]
    pub url_template: Option<String>,
    #[serde(default)]
    pub default_instrument: Instrument,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Hours between consecutive frames of a series.
    #[serde(default = "default_cadence_hours")]
    pub cadence_hours: f64,
}

fn default_cadence_hours() -> f64 {
    DEFAULT_CADENCE_HOURS
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            cadence_hours: DEFAULT_CADENCE_HOURS,
        }
    }
}

/// Full configuration, loadable from TOML. Every section is optional.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SunspotConfig {
    #[serde(default = "default_data_root")]
    pub data_root: PathBuf,
    #[serde(default)]
    pub fits: FitsConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub tracking: TrackingConfig,
    #[serde(default)]
    pub acquisition: AcquisitionConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

fn default_data_root() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_ROOT)
}

impl Default for SunspotConfig {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
            fits: FitsConfig::default(),
            detection: DetectionConfig::default(),
            tracking: TrackingConfig::default(),
            acquisition: AcquisitionConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}
