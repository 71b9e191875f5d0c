mod common;

use ndarray::Array2;

use common::{disk_frame, geometry};
use sunspot_core::detection::components::connected_components;
use sunspot_core::detection::morphology::{dilate, erode, morphological_closing};
use sunspot_core::detection::spots::extract_candidates;
use sunspot_core::detection::{
    detect_spots, group_detections, strategy_for, ClusterStrategy, ClusteringMethod,
    DensityClustering, DetectionConfig, RawDetection, SingletonClustering,
};
use sunspot_core::frame::{BoundingBox, Point};

fn config_with_eps(eps: f64) -> DetectionConfig {
    DetectionConfig {
        min_distance_between_clusters: eps,
        ..Default::default()
    }
}

#[test]
fn test_two_separate_disks_give_two_spots() {
    let frame = disk_frame(300, 300, &[(100.0, 100.0, 20.0), (200.0, 200.0, 20.0)], 0);
    let geometry = geometry((150, 150), 150, 300);

    let result = detect_spots(&frame, &geometry, &config_with_eps(100.0), &DensityClustering);
    assert_eq!(result.spots.len(), 2);

    for target in [Point::new(100.0, 100.0), Point::new(200.0, 200.0)] {
        let hit = result
            .spots
            .iter()
            .any(|s| s.centroid.distance(&target) <= 10.0);
        assert!(hit, "no spot near {target:?}: {:?}", result.spots);
    }
}

#[test]
fn test_overlapping_disks_give_one_spot() {
    let frame = disk_frame(300, 300, &[(100.0, 100.0, 20.0), (110.0, 110.0, 20.0)], 0);
    let geometry = geometry((150, 150), 150, 300);

    let result = detect_spots(&frame, &geometry, &config_with_eps(100.0), &DensityClustering);
    assert_eq!(result.spots.len(), 1);
    let centroid = result.spots[0].centroid;
    assert!(centroid.distance(&Point::new(105.0, 105.0)) <= 10.0);
}

#[test]
fn test_area_outside_bounds_yields_nothing() {
    let frame = disk_frame(300, 300, &[(100.0, 100.0, 5.0), (200.0, 200.0, 5.0)], 0);
    let geometry = geometry((150, 150), 150, 300);

    let result = detect_spots(&frame, &geometry, &config_with_eps(100.0), &DensityClustering);
    assert!(result.raw.is_empty());
    assert!(result.spots.is_empty());

    let big = disk_frame(300, 300, &[(150.0, 150.0, 20.0)], 0);
    let strict = DetectionConfig {
        min_area: 5000,
        max_area: 6000,
        ..Default::default()
    };
    let result = detect_spots(&big, &geometry, &strict, &DensityClustering);
    assert!(result.raw.is_empty());
    assert!(result.spots.is_empty());
}

#[test]
fn test_far_region_is_excluded_even_if_area_qualifies() {
    let frame = disk_frame(300, 300, &[(150.0, 150.0, 20.0), (260.0, 150.0, 20.0)], 0);
    // Admission radius is 0.9 * 100 = 90 px; the second disk sits at 110 px.
    let geometry = geometry((150, 150), 100, 300);

    let raw = extract_candidates(&frame, &geometry, &config_with_eps(20.0));
    assert_eq!(raw.len(), 1);
    assert!(raw[0].centroid.distance(&Point::new(150.0, 150.0)) <= 3.0);
    assert!(raw[0].area > 1000 && raw[0].area < 5000);
}

#[test]
fn test_density_clustering_is_transitive() {
    let points = [
        Point::new(0.0, 0.0),
        Point::new(15.0, 0.0),
        Point::new(30.0, 0.0),
        Point::new(100.0, 100.0),
    ];
    let labels = DensityClustering.cluster(&points, 20.0);
    assert_eq!(labels, vec![0, 0, 0, 1]);
}

#[test]
fn test_density_clustering_is_order_independent() {
    let points = [
        Point::new(100.0, 100.0),
        Point::new(30.0, 0.0),
        Point::new(0.0, 0.0),
        Point::new(15.0, 0.0),
    ];
    let labels = DensityClustering.cluster(&points, 20.0);
    assert_eq!(labels[1], labels[2]);
    assert_eq!(labels[2], labels[3]);
    assert_ne!(labels[0], labels[1]);
}

#[test]
fn test_distance_equal_to_eps_links() {
    let points = [Point::new(0.0, 0.0), Point::new(3.0, 4.0)];
    assert_eq!(DensityClustering.cluster(&points, 5.0), vec![0, 0]);
    assert_eq!(DensityClustering.cluster(&points, 4.99), vec![0, 1]);
}

#[test]
fn test_singleton_strategy_keeps_every_detection() {
    let points = [Point::new(0.0, 0.0), Point::new(1.0, 0.0)];
    assert_eq!(SingletonClustering.cluster(&points, 100.0), vec![0, 1]);
    assert_eq!(strategy_for(ClusteringMethod::Singleton).name(), "singleton");
    assert_eq!(strategy_for(ClusteringMethod::Density).name(), "density");
}

#[test]
fn test_grouping_unions_boxes_and_averages_centroids() {
    let raw = [
        RawDetection {
            bbox: BoundingBox::new(10, 10, 5, 5),
            centroid: Point::new(12.0, 12.0),
            area: 25,
        },
        RawDetection {
            bbox: BoundingBox::new(20, 8, 4, 10),
            centroid: Point::new(22.0, 13.0),
            area: 40,
        },
    ];
    let spots = group_detections(&raw, 15.0, &DensityClustering);
    assert_eq!(spots.len(), 1);
    assert_eq!(spots[0].bbox, BoundingBox::new(10, 8, 14, 10));
    assert_eq!(spots[0].centroid, Point::new(17.0, 12.5));
    assert_eq!(spots[0].members, 2);

    assert!(group_detections(&[], 15.0, &DensityClustering).is_empty());
}

#[test]
fn test_components_use_eight_connectivity() {
    let mut mask = Array2::from_elem((5, 5), false);
    mask[[0, 0]] = true;
    mask[[1, 1]] = true;
    mask[[2, 2]] = true;
    mask[[4, 0]] = true;

    let components = connected_components(&mask);
    assert_eq!(components.len(), 2);
    assert_eq!(components[0].area, 3);
    assert_eq!(components[0].bbox, BoundingBox::new(0, 0, 3, 3));
    assert_eq!(components[0].centroid, Point::new(1.0, 1.0));
    assert_eq!(components[1].area, 1);
}

#[test]
fn test_components_merge_u_shape() {
    // Two arms joined only at the bottom need label merging.
    let mut mask = Array2::from_elem((4, 5), false);
    for row in 0..4 {
        mask[[row, 0]] = true;
        mask[[row, 4]] = true;
    }
    for col in 0..5 {
        mask[[3, col]] = true;
    }
    let components = connected_components(&mask);
    assert_eq!(components.len(), 1);
    assert_eq!(components[0].area, 11);
}

#[test]
fn test_closing_fills_single_pixel_gap() {
    let mut mask = Array2::from_elem((7, 11), false);
    for row in 2..5 {
        for col in 2..9 {
            mask[[row, col]] = col != 5;
        }
    }
    let closed = morphological_closing(&mask);
    assert!(closed[[3, 5]]);
    // No growth outside the original block.
    assert!(!closed[[1, 3]]);
    assert!(!closed[[3, 9]]);
    assert!(!closed[[0, 0]]);
}

#[test]
fn test_image_edge_does_not_erode() {
    let mask = Array2::from_elem((3, 3), true);
    assert!(erode(&mask).iter().all(|&v| v));
    let empty = Array2::from_elem((3, 3), false);
    assert!(dilate(&empty).iter().all(|&v| !v));
}
