use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_ADAPTIVE_BLOCK_SIZE, DEFAULT_ADAPTIVE_OFFSET, DEFAULT_BLUR_KERNEL_SIZE,
    DEFAULT_MAX_DISTANCE_RATIO, DEFAULT_MAX_SPOT_AREA, DEFAULT_MIN_DISTANCE_BETWEEN_CLUSTERS,
    DEFAULT_MIN_SPOT_AREA,
};

/// How admitted detections are grouped into spots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusteringMethod {
    /// Transitive distance linkage; every detection joins exactly one cluster.
    #[default]
    Density,
    /// Degraded mode: every detection is its own spot.
    Singleton,
}

/// Configuration for sunspot detection on the first frame of a series.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Side length of the smoothing kernel (odd).
    #[serde(default = "default_blur_kernel_size")]
    pub blur_kernel_size: usize,
    /// Neighborhood size of the adaptive threshold (odd).
    #[serde(default = "default_adaptive_block_size")]
    pub adaptive_block_size: usize,
    /// Subtracted from the local mean; pixels at or below the result are foreground.
    #[serde(default = "default_adaptive_offset")]
    pub adaptive_offset: i32,
    /// Exclusive lower area bound (pixels).
    #[serde(default = "default_min_area")]
    pub min_area: usize,
    /// Exclusive upper area bound (pixels).
    #[serde(default = "default_max_area")]
    pub max_area: usize,
    /// Admission radius as a fraction of the disk radius.
    #[serde(default = "default_max_distance_ratio")]
    pub max_distance_ratio: f64,
    /// Linkage distance (pixels) between centroids of one spot.
    #[serde(default = "default_min_distance_between_clusters")]
    pub min_distance_between_clusters: f64,
    #[serde(default)]
    pub clustering: ClusteringMethod,
}

fn default_blur_kernel_size() -> usize {
    DEFAULT_BLUR_KERNEL_SIZE
}
fn default_adaptive_block_size() -> usize {
    DEFAULT_ADAPTIVE_BLOCK_SIZE
}
fn default_adaptive_offset() -> i32 {
    DEFAULT_ADAPTIVE_OFFSET
}
fn default_min_area() -> usize {
    DEFAULT_MIN_SPOT_AREA
}
fn default_max_area() -> usize {
    DEFAULT_MAX_SPOT_AREA
}
fn default_max_distance_ratio() -> f64 {
    DEFAULT_MAX_DISTANCE_RATIO
}
fn default_min_distance_between_clusters() -> f64 {
    DEFAULT_MIN_DISTANCE_BETWEEN_CLUSTERS
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            blur_kernel_size: DEFAULT_BLUR_KERNEL_SIZE,
            adaptive_block_size: DEFAULT_ADAPTIVE_BLOCK_SIZE,
            adaptive_offset: DEFAULT_ADAPTIVE_OFFSET,
            min_area: DEFAULT_MIN_SPOT_AREA,
            max_area: DEFAULT_MAX_SPOT_AREA,
            max_distance_ratio: DEFAULT_MAX_DISTANCE_RATIO,
            min_distance_between_clusters: DEFAULT_MIN_DISTANCE_BETWEEN_CLUSTERS,
            clustering: ClusteringMethod::default(),
        }
    }
}
