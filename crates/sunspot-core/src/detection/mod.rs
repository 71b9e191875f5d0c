pub mod cluster;
pub mod components;
pub mod config;
pub mod morphology;
pub mod spots;
pub mod threshold;

pub use cluster::{strategy_for, ClusterStrategy, DensityClustering, SingletonClustering};
pub use config::{ClusteringMethod, DetectionConfig};
pub use spots::{detect_spots, group_detections, Detection, GroupedSpot, RawDetection};
