/// Core data types for the crop recommendation and sensor telemetry service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no I/O and no external connections — only types and the
/// validation step that turns raw tabular rows into clean feature records.

use chrono::{DateTime, Utc};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Feature columns
// ---------------------------------------------------------------------------

/// The six numeric features describing one observation or query, in the
/// canonical column order used by the curated dataset and by the suggestion
/// payload. Payload field names are capitalized to match the dataset header.
pub const FEATURE_FIELDS: [&str; 6] = [
    "Temperature",
    "Humidity",
    "Rainfall",
    "Nitrogen",
    "Potassium",
    "Phosphorous",
];

/// Label column name in the curated dataset header.
pub const LABEL_FIELD: &str = "Crop Type";

/// One point in the 6-dimensional feature space, in `FEATURE_FIELDS` order.
pub type FeatureVector = [f64; 6];

// ---------------------------------------------------------------------------
// Crop records
// ---------------------------------------------------------------------------

/// A raw tabular row as delivered by a tabular source, before validation.
///
/// Each feature is `None` when the source value was absent or could not be
/// coerced to a number. The label is `None` when absent or empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCropRow {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub rainfall: Option<f64>,
    pub nitrogen: Option<f64>,
    pub potassium: Option<f64>,
    pub phosphorous: Option<f64>,
    pub crop_type: Option<String>,
}

impl RawCropRow {
    /// Promotes this row to a validated record, or `None` if any feature
    /// or the label is missing. Rows rejected here are simply excluded
    /// from the feature table.
    pub fn validate(self) -> Option<CropRecord> {
        Some(CropRecord {
            temperature: self.temperature?,
            humidity: self.humidity?,
            rainfall: self.rainfall?,
            nitrogen: self.nitrogen?,
            potassium: self.potassium?,
            phosphorous: self.phosphorous?,
            crop_type: self.crop_type?,
        })
    }
}

/// One validated historical observation from the curated crop dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropRecord {
    pub temperature: f64,
    pub humidity: f64,
    pub rainfall: f64,
    pub nitrogen: f64,
    pub potassium: f64,
    pub phosphorous: f64,
    pub crop_type: String,
}

impl CropRecord {
    /// The numeric features in `FEATURE_FIELDS` order.
    pub fn features(&self) -> FeatureVector {
        [
            self.temperature,
            self.humidity,
            self.rainfall,
            self.nitrogen,
            self.potassium,
            self.phosphorous,
        ]
    }
}

// ---------------------------------------------------------------------------
// Sensor readings
// ---------------------------------------------------------------------------

/// A single reading from the curated sensor table in the warehouse.
///
/// Owned by the warehouse — this service reads and appends readings but
/// never mutates or deletes existing ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorReading {
    pub event_time: DateTime<Utc>,
    pub device_id: String,
    pub temperature: f64,
    pub humidity: f64,
    pub rainfall: f64,
    pub nitrogen: f64,
    pub potassium: f64,
    pub phosphorous: f64,
    pub source: String,
    pub ingestion_time: DateTime<Utc>,
}

impl SensorReading {
    /// The numeric measurements in `FEATURE_FIELDS` order.
    pub fn parameters(&self) -> FeatureVector {
        [
            self.temperature,
            self.humidity,
            self.rainfall,
            self.nitrogen,
            self.potassium,
            self.phosphorous,
        ]
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise while loading data, validating caller input, or
/// querying the warehouse.
///
/// An unknown crop name is deliberately NOT an error anywhere in this
/// service — it is signaled as an absent result (`Option::None`) and
/// filtered by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// A required input field was absent from the caller's payload.
    MissingField(String),
    /// Caller input was present but out of bounds or wrongly typed.
    /// Rejected before any query is issued.
    InvalidArgument(String),
    /// A tabular data source could not be reached or read. Recovered by
    /// falling back to the next source; fatal only if every source fails.
    SourceUnavailable(String),
    /// A source's content could not be interpreted.
    Parse(String),
    /// A warehouse query failed at request time. Surfaced to the caller,
    /// never retried automatically.
    Query(String),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::MissingField(field) => write!(f, "Missing field: '{}'", field),
            ServiceError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            ServiceError::SourceUnavailable(msg) => write!(f, "Data source unavailable: {}", msg),
            ServiceError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ServiceError::Query(msg) => write!(f, "Query error: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<postgres::Error> for ServiceError {
    fn from(err: postgres::Error) -> Self {
        ServiceError::Query(err.to_string())
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        ServiceError::SourceUnavailable(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn full_row() -> RawCropRow {
        RawCropRow {
            temperature: Some(20.0),
            humidity: Some(80.0),
            rainfall: Some(200.0),
            nitrogen: Some(40.0),
            potassium: Some(30.0),
            phosphorous: Some(20.0),
            crop_type: Some("Rice".to_string()),
        }
    }

    #[test]
    fn test_complete_row_validates() {
        let record = full_row().validate().expect("complete row should validate");
        assert_eq!(record.crop_type, "Rice");
        assert_eq!(record.features(), [20.0, 80.0, 200.0, 40.0, 30.0, 20.0]);
    }

    #[test]
    fn test_row_with_missing_feature_is_rejected() {
        let mut row = full_row();
        row.rainfall = None;
        assert!(
            row.validate().is_none(),
            "row missing a feature must be excluded from the feature table"
        );
    }

    #[test]
    fn test_row_with_missing_label_is_rejected() {
        let mut row = full_row();
        row.crop_type = None;
        assert!(
            row.validate().is_none(),
            "row missing its label must be excluded from the feature table"
        );
    }

    #[test]
    fn test_feature_order_matches_field_names() {
        // features() must follow FEATURE_FIELDS order — the neighbor index,
        // aggregates, and payload shaping all rely on this alignment.
        assert_eq!(FEATURE_FIELDS[0], "Temperature");
        assert_eq!(FEATURE_FIELDS[5], "Phosphorous");
        let record = full_row().validate().unwrap();
        assert_eq!(record.features()[0], record.temperature);
        assert_eq!(record.features()[5], record.phosphorous);
    }

    #[test]
    fn test_error_display_names_the_missing_field() {
        let err = ServiceError::MissingField("Rainfall".to_string());
        assert_eq!(err.to_string(), "Missing field: 'Rainfall'");
    }
}
