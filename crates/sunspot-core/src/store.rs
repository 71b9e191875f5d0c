use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::consts::{DISPLACEMENT_TABLE_FILE_NAME, DISPLACEMENT_TABLE_HEADER};
use crate::error::{Result, SunspotError};

/// One accepted measurement: start and end pixel positions of a spot and the
/// number of frame intervals between them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplacementRecord {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub frame_span: f64,
}

impl DisplacementRecord {
    fn to_row(self) -> [String; 5] {
        [self.x1, self.y1, self.x2, self.y2, self.frame_span].map(|v| format!("{v:.8}"))
    }
}

/// Append-only displacement table of one series.
#[derive(Clone, Debug)]
pub struct DisplacementStore {
    path: PathBuf,
}

impl DisplacementStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the standard table location inside a series directory.
    pub fn in_series_dir(dir: &Path) -> Self {
        Self::new(dir.join(DISPLACEMENT_TABLE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record. A missing file is an empty table.
    pub fn read(&self) -> Result<Vec<DisplacementRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)?;

        let mut records = Vec::new();
        for (line, row) in reader.records().enumerate() {
            let row = row?;
            let value = |i: usize| -> Result<f64> {
                let field = row.get(i).ok_or_else(|| {
                    SunspotError::InvalidParameter(format!(
                        "{} row {} has {} columns, expected 5",
                        self.path.display(),
                        line + 1,
                        row.len()
                    ))
                })?;
                field.parse::<f64>().map_err(|_| {
                    SunspotError::InvalidParameter(format!(
                        "{} row {}: '{field}' is not a number",
                        self.path.display(),
                        line + 1
                    ))
                })
            };
            records.push(DisplacementRecord {
                x1: value(0)?,
                y1: value(1)?,
                x2: value(2)?,
                y2: value(3)?,
                frame_span: value(4)?,
            });
        }
        debug!(path = %self.path.display(), rows = records.len(), "Read displacement table");
        Ok(records)
    }

    /// Append records by reading the whole table and rewriting it.
    ///
    /// The new table is written next to the old one and renamed over it, so an
    /// interrupted append leaves the previous rows intact.
    pub fn append(&self, new_records: &[DisplacementRecord]) -> Result<()> {
        let mut records = self.read()?;
        records.extend_from_slice(new_records);

        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let temp_path = self.temp_path();
        let mut writer = csv::Writer::from_path(&temp_path)?;
        writer.write_record(DISPLACEMENT_TABLE_HEADER)?;
        for record in &records {
            writer.write_record(record.to_row())?;
        }
        writer.flush()?;
        drop(writer);
        std::fs::rename(&temp_path, &self.path)?;

        info!(
            path = %self.path.display(),
            added = new_records.len(),
            total = records.len(),
            "Appended displacement records"
        );
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
