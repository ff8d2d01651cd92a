/// Tabular data sources for the curated crop dataset.
///
/// Two interchangeable providers feed the feature table: the analytical
/// warehouse (primary) and a local delimited export (fallback). Selection
/// is a capability probe, not exception catching — each provider reports
/// whether it is reachable before a fetch is attempted.
///
/// Submodules:
/// - `warehouse` — reads `crops_data_curated` over a postgres connection.
/// - `localfile` — parses the semicolon-delimited local export.

use crate::logging::{self, DataSource};
use crate::model::{CropRecord, RawCropRow, ServiceError};

pub mod localfile;
pub mod warehouse;

// ---------------------------------------------------------------------------
// Source abstraction
// ---------------------------------------------------------------------------

/// A provider of raw crop dataset rows.
pub trait TabularSource {
    /// Short name used in log lines.
    fn name(&self) -> &'static str;

    /// Log tag for this provider.
    fn tag(&self) -> DataSource;

    /// Cheap reachability check, run before any fetch. A provider that
    /// fails its probe is skipped without being treated as an error.
    fn probe(&self) -> bool;

    /// Fetches every raw row from the provider.
    fn fetch_rows(&self) -> Result<Vec<RawCropRow>, ServiceError>;
}

// ---------------------------------------------------------------------------
// Feature table construction
// ---------------------------------------------------------------------------

/// Drops rows with any missing feature or missing label. No deduplication
/// is performed — repeated observations are legitimate data.
pub fn validate_rows(rows: Vec<RawCropRow>) -> Vec<CropRecord> {
    rows.into_iter().filter_map(RawCropRow::validate).collect()
}

/// Loads the validated feature table from the first usable source.
///
/// Sources are tried in order. A failed probe or a failed fetch moves on
/// to the next source after logging; the failure is not propagated. Only
/// when every source has been exhausted does loading fail.
///
/// An empty result set from a working source is valid — downstream
/// components tolerate an empty feature table.
pub fn load_records(sources: &[Box<dyn TabularSource>]) -> Result<Vec<CropRecord>, ServiceError> {
    for source in sources {
        if !source.probe() {
            logging::warn(
                source.tag(),
                None,
                &format!("{} unreachable, trying next source", source.name()),
            );
            continue;
        }

        match source.fetch_rows() {
            Ok(rows) => {
                let total = rows.len();
                let records = validate_rows(rows);
                logging::info(
                    source.tag(),
                    None,
                    &format!(
                        "loaded {} records from {} ({} rows dropped in validation)",
                        records.len(),
                        source.name(),
                        total - records.len()
                    ),
                );
                return Ok(records);
            }
            Err(err) => {
                logging::log_source_failure(source.tag(), "dataset fetch", &err);
            }
        }
    }

    Err(ServiceError::SourceUnavailable(
        "no tabular data source is available".to_string(),
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
