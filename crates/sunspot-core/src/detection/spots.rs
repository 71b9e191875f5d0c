use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::filters::gaussian_blur::blur_frame;
use crate::frame::{BoundingBox, Frame, Point};
use crate::geometry::CalibrationGeometry;

use super::cluster::ClusterStrategy;
use super::components::connected_components;
use super::config::DetectionConfig;
use super::morphology::morphological_closing;
use super::threshold::adaptive_threshold_inv;

/// One admitted connected region.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    pub bbox: BoundingBox,
    pub centroid: Point,
    pub area: usize,
}

/// A cluster of raw detections reported as one sunspot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupedSpot {
    /// Union of the member boxes.
    pub bbox: BoundingBox,
    /// Mean of the member centroids.
    pub centroid: Point,
    pub members: usize,
}

/// Result of running the detector on one frame.
#[derive(Clone, Debug, Default)]
pub struct Detection {
    pub raw: Vec<RawDetection>,
    pub spots: Vec<GroupedSpot>,
}

impl Detection {
    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }
}

/// Extract candidate regions from a frame and admit those that pass the area
/// and disk-distance filters.
pub fn extract_candidates(
    frame: &Frame,
    geometry: &CalibrationGeometry,
    config: &DetectionConfig,
) -> Vec<RawDetection> {
    let blurred = blur_frame(frame, config.blur_kernel_size);
    let mask = adaptive_threshold_inv(
        &blurred.data,
        config.adaptive_block_size,
        config.adaptive_offset,
    );
    let closed = morphological_closing(&mask);

    let center = geometry.center();
    let max_distance = config.max_distance_ratio * geometry.radius();

    let components = connected_components(&closed);
    let total = components.len();
    let admitted: Vec<RawDetection> = components
        .into_iter()
        .filter(|c| c.area > config.min_area && c.area < config.max_area)
        .filter(|c| c.centroid.distance(&center) <= max_distance)
        .map(|c| RawDetection {
            bbox: c.bbox,
            centroid: c.centroid,
            area: c.area,
        })
        .collect();

    debug!(
        frame = frame.index,
        components = total,
        admitted = admitted.len(),
        "Extracted spot candidates"
    );
    admitted
}

/// Merge raw detections by clustering their centroids.
pub fn group_detections(
    raw: &[RawDetection],
    eps: f64,
    strategy: &dyn ClusterStrategy,
) -> Vec<GroupedSpot> {
    if raw.is_empty() {
        return Vec::new();
    }

    let points: Vec<Point> = raw.iter().map(|d| d.centroid).collect();
    let labels = strategy.cluster(&points, eps);
    let clusters = labels.iter().copied().max().map_or(0, |m| m + 1);

    (0..clusters)
        .filter_map(|label| {
            let members: Vec<&RawDetection> = raw
                .iter()
                .zip(&labels)
                .filter(|(_, &l)| l == label)
                .map(|(d, _)| d)
                .collect();
            let first = members.first()?;
            let bbox = members
                .iter()
                .skip(1)
                .fold(first.bbox, |acc, d| acc.union(&d.bbox));
            let n = members.len() as f64;
            let centroid = Point::new(
                members.iter().map(|d| d.centroid.x).sum::<f64>() / n,
                members.iter().map(|d| d.centroid.y).sum::<f64>() / n,
            );
            Some(GroupedSpot {
                bbox,
                centroid,
                members: members.len(),
            })
        })
        .collect()
}

/// Full detector: candidate extraction followed by clustering.
pub fn detect_spots(
    frame: &Frame,
    geometry: &CalibrationGeometry,
    config: &DetectionConfig,
    strategy: &dyn ClusterStrategy,
) -> Detection {
    let raw = extract_candidates(frame, geometry, config);
    let spots = group_detections(&raw, config.min_distance_between_clusters, strategy);
    info!(
        frame = frame.index,
        candidates = raw.len(),
        spots = spots.len(),
        clustering = strategy.name(),
        "Detected sunspots"
    );
    Detection { raw, spots }
}
