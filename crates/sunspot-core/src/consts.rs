/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Small epsilon to avoid division by zero in floating-point comparisons.
pub const EPSILON: f64 = 1e-12;

/// HDU holding the image and calibration header in archive solar images.
pub const DEFAULT_DATA_HDU: usize = 1;

/// Side length of the square smoothing kernel applied before thresholding.
pub const DEFAULT_BLUR_KERNEL_SIZE: usize = 13;

/// Neighborhood size (pixels) for the adaptive local threshold.
pub const DEFAULT_ADAPTIVE_BLOCK_SIZE: usize = 301;

/// Offset subtracted from the local mean before comparing a pixel.
pub const DEFAULT_ADAPTIVE_OFFSET: i32 = 30;

/// Candidate regions must be strictly larger than this (pixels).
pub const DEFAULT_MIN_SPOT_AREA: usize = 1000;

/// Candidate regions must be strictly smaller than this (pixels).
pub const DEFAULT_MAX_SPOT_AREA: usize = 5000;

/// Maximum centroid distance from disk center, as a fraction of the disk radius.
pub const DEFAULT_MAX_DISTANCE_RATIO: f64 = 0.9;

/// Centroids closer than this (pixels) end up in the same grouped spot.
pub const DEFAULT_MIN_DISTANCE_BETWEEN_CLUSTERS: f64 = 20.0;

/// Padding added on every side of a detected box before tracker initialization.
pub const DEFAULT_OVERSIZE: i32 = 20;

/// Search radius (pixels) of the template tracker around the previous box.
pub const DEFAULT_TEMPLATE_SEARCH_RADIUS: i32 = 30;

/// Minimum normalized cross-correlation for a template match to count as success.
pub const DEFAULT_TEMPLATE_MIN_SCORE: f64 = 0.5;

/// Blend rate of the matched patch into the template after a successful update.
pub const DEFAULT_TEMPLATE_ADAPT_RATE: f32 = 0.0;

/// Minimum phase-correlation peak height for a successful update.
pub const DEFAULT_PHASE_MIN_PEAK: f64 = 0.05;

/// Limb guide circle drawn at this fraction of the disk radius.
pub const LIMB_GUIDE_RATIO: f64 = 0.9;

/// Line thickness (pixels) of overlay guides.
pub const OVERLAY_LINE_THICKNESS: i32 = 3;

/// Magnification of the region-of-interest inset.
pub const INSET_ZOOM: u32 = 10;

/// Margin (pixels) around the tracker box included in the inset.
pub const INSET_MARGIN: i32 = 20;

/// Top-left corner (pixels) where the inset is pasted.
pub const INSET_POSITION: u32 = 50;

/// Width (pixels) of the red border marking a failed tracker update.
pub const FAILURE_BORDER_WIDTH: u32 = 8;

/// Directory under the working directory that holds all series.
pub const DEFAULT_DATA_ROOT: &str = "data";

/// Prefix of series directory names (`TR_01`, `TR_02`, ...).
pub const SERIES_DIR_PREFIX: &str = "TR_";

/// Manifest listing the frames of a series in processing order.
pub const MANIFEST_FILE_NAME: &str = "names.txt";

/// Displacement table of a series.
pub const DISPLACEMENT_TABLE_FILE_NAME: &str = "data_points.csv";

/// Column names of the displacement table.
pub const DISPLACEMENT_TABLE_HEADER: [&str; 5] = [
    "xcoor[pix]",
    "ycorr[pix]",
    "x2[pix]",
    "y2[pix]",
    "delta_time [h]",
];

/// Timestamp format accepted for acquisition time ranges.
pub const ACQUISITION_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Hours between consecutive frames of a series.
pub const DEFAULT_CADENCE_HOURS: f64 = 1.0;
