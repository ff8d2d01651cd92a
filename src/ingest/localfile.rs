/// Local delimited-file reader for the curated crop dataset.
///
/// The fallback provider when the warehouse is unreachable. The export is
/// a header line naming the six feature columns and the label column,
/// followed by one row per observation, delimited by semicolons.
///
/// Coercion happens here: a value that does not parse as a number becomes
/// missing, and validation downstream drops the row. Short rows behave the
/// same way — absent cells are missing values, not parse errors.

use std::path::{Path, PathBuf};

use crate::logging::DataSource;
use crate::model::{FEATURE_FIELDS, LABEL_FIELD, RawCropRow, ServiceError};

use super::TabularSource;

pub struct FileSource {
    path: PathBuf,
    delimiter: char,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, delimiter: char) -> Self {
        FileSource {
            path: path.into(),
            delimiter,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TabularSource for FileSource {
    fn name(&self) -> &'static str {
        "local dataset file"
    }

    fn tag(&self) -> DataSource {
        DataSource::LocalFile
    }

    fn probe(&self) -> bool {
        self.path.is_file()
    }

    fn fetch_rows(&self) -> Result<Vec<RawCropRow>, ServiceError> {
        let text = std::fs::read_to_string(&self.path)?;
        parse_rows(&text, self.delimiter)
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Column positions resolved from the header line.
struct ColumnMap {
    features: [usize; 6],
    label: usize,
}

fn map_columns(header: &str, delimiter: char) -> Result<ColumnMap, ServiceError> {
    let names: Vec<&str> = header.split(delimiter).map(str::trim).collect();

    let position = |wanted: &str| -> Result<usize, ServiceError> {
        names
            .iter()
            .position(|n| *n == wanted)
            .ok_or_else(|| ServiceError::Parse(format!("column '{}' missing from header", wanted)))
    };

    let mut features = [0usize; 6];
    for (slot, field) in features.iter_mut().zip(FEATURE_FIELDS.iter()) {
        *slot = position(field)?;
    }

    Ok(ColumnMap {
        features,
        label: position(LABEL_FIELD)?,
    })
}

/// Parses the full file content into raw rows.
///
/// The first non-empty line is the header. Blank lines are skipped.
pub fn parse_rows(text: &str, delimiter: char) -> Result<Vec<RawCropRow>, ServiceError> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());

    let header = lines
        .next()
        .ok_or_else(|| ServiceError::Parse("dataset file is empty".to_string()))?;
    let columns = map_columns(header, delimiter)?;

    let mut rows = Vec::new();
    for line in lines {
        let cells: Vec<&str> = line.split(delimiter).collect();

        // Non-finite parses ("NaN", "inf") count as missing, same as
        // unparseable text.
        let numeric = |idx: usize| -> Option<f64> {
            cells.get(idx)?.trim().parse().ok().filter(|v: &f64| v.is_finite())
        };

        let [t, h, r, n, k, p] = columns.features;
        rows.push(RawCropRow {
            temperature: numeric(t),
            humidity: numeric(h),
            rainfall: numeric(r),
            nitrogen: numeric(n),
            potassium: numeric(k),
            phosphorous: numeric(p),
            crop_type: cells
                .get(columns.label)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(String::from),
        });
    }

    Ok(rows)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
