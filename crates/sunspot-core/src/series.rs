use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::consts::{MANIFEST_FILE_NAME, SERIES_DIR_PREFIX};
use crate::error::{Result, SunspotError};
use crate::frame::Frame;
use crate::geometry::{extract_geometry, CalibrationGeometry};
use crate::normalize::load_normalized;
use crate::progress::{ProgressReporter, Stage};
use crate::store::DisplacementStore;

/// Directory name of series `index` (`TR_01`, `TR_02`, ...).
pub fn series_dir_name(index: u32) -> String {
    format!("{SERIES_DIR_PREFIX}{index:02}")
}

/// One image series: a directory with image files, a manifest and a
/// displacement table.
#[derive(Clone, Debug)]
pub struct Series {
    index: u32,
    dir: PathBuf,
}

impl Series {
    /// Series `index` under `root`. The directory is not checked here; reading
    /// the manifest reports a missing series.
    pub fn open(root: &Path, index: u32) -> Self {
        Self {
            index,
            dir: root.join(series_dir_name(index)),
        }
    }

    /// Allocate the next free series directory under `root`.
    pub fn create_next(root: &Path) -> Result<Self> {
        let index = next_series_index(root)?;
        let series = Self::open(root, index);
        fs::create_dir_all(&series.dir)?;
        info!(dir = %series.dir.display(), "Created series directory");
        Ok(series)
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE_NAME)
    }

    pub fn store(&self) -> DisplacementStore {
        DisplacementStore::in_series_dir(&self.dir)
    }

    /// File names listed in the manifest, in processing order.
    pub fn read_manifest(&self) -> Result<Vec<String>> {
        let path = self.manifest_path();
        if !path.is_file() {
            return Err(SunspotError::not_found(path));
        }
        let names = fs::read_to_string(&path)?
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect();
        Ok(names)
    }

    pub fn write_manifest(&self, names: &[String]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let mut contents = names.join("\n");
        contents.push('\n');
        fs::write(self.manifest_path(), contents)?;
        Ok(())
    }

    pub fn frame_paths(&self) -> Result<Vec<PathBuf>> {
        let paths: Vec<PathBuf> = self
            .read_manifest()?
            .into_iter()
            .map(|name| self.dir.join(name))
            .collect();
        if paths.is_empty() {
            return Err(SunspotError::EmptyResult(format!(
                "Manifest {} lists no images",
                self.manifest_path().display()
            )));
        }
        Ok(paths)
    }

    /// Geometry of the series, read from its first frame.
    pub fn geometry(&self, hdu: usize) -> Result<CalibrationGeometry> {
        let paths = self.frame_paths()?;
        extract_geometry(&paths[0], hdu)
    }

    /// Load and normalize every frame of the manifest.
    ///
    /// All frames must share the first frame's shape; this is checked once
    /// here and never again downstream.
    pub fn load_frames(&self, hdu: usize, progress: &dyn ProgressReporter) -> Result<Vec<Frame>> {
        let paths = self.frame_paths()?;
        progress.begin_stage(Stage::Loading, Some(paths.len()));

        let mut frames: Vec<Frame> = Vec::with_capacity(paths.len());
        for (i, path) in paths.iter().enumerate() {
            let frame = load_normalized(path, hdu, i)?;
            if let Some(first) = frames.first() {
                if frame.data.dim() != first.data.dim() {
                    return Err(SunspotError::GeometryMismatch {
                        index: i,
                        width: first.width(),
                        height: first.height(),
                        found_width: frame.width(),
                        found_height: frame.height(),
                    });
                }
            }
            debug!(path = %path.display(), index = i, "Loaded frame");
            frames.push(frame);
            progress.advance(i + 1);
        }

        progress.finish_stage();
        if frames.is_empty() {
            return Err(SunspotError::EmptyResult(format!(
                "No images could be loaded for {}",
                self.dir.display()
            )));
        }
        Ok(frames)
    }
}

/// Index following the highest existing `TR_XX` directory under `root`.
pub fn next_series_index(root: &Path) -> Result<u32> {
    existing_series(root).map(|indices| indices.last().map_or(1, |last| last + 1))
}

/// Sorted indices of the series directories under `root`.
pub fn existing_series(root: &Path) -> Result<Vec<u32>> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }
    let mut indices: Vec<u32> = fs::read_dir(root)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| {
            entry
                .file_name()
                .to_str()?
                .strip_prefix(SERIES_DIR_PREFIX)?
                .parse::<u32>()
                .ok()
        })
        .collect();
    indices.sort_unstable();
    Ok(indices)
}
