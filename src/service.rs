/// Request-level operations behind the HTTP boundary.
///
/// The routing framework itself lives outside this crate; these functions
/// are what its handlers call. Each one validates caller input, shapes the
/// response payload, and keeps the read result independent of any
/// best-effort write.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::engine::CropModel;
use crate::logging::{self, DataSource};
use crate::model::{FEATURE_FIELDS, FeatureVector, SensorReading, ServiceError};
use crate::repo::SensorRepository;

// ---------------------------------------------------------------------------
// Suggestion input
// ---------------------------------------------------------------------------

/// Extracts the six named numeric features from a JSON object.
///
/// Field names are the capitalized dataset names ("Temperature", ...).
/// An absent field fails with an error naming that field; a field that is
/// present but not numeric is rejected as wrongly typed.
pub fn features_from_json(payload: &Value) -> Result<FeatureVector, ServiceError> {
    let mut features = [0.0; 6];
    for (slot, field) in features.iter_mut().zip(FEATURE_FIELDS.iter()) {
        let value = payload
            .get(*field)
            .ok_or_else(|| ServiceError::MissingField(field.to_string()))?;
        *slot = value.as_f64().ok_or_else(|| {
            ServiceError::InvalidArgument(format!("field '{}' must be a number", field))
        })?;
    }
    Ok(features)
}

/// Response body for the suggestion endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestResponse {
    pub suggestions: Vec<String>,
}

/// Validates the suggestion payload and runs the model.
pub fn suggest(model: &CropModel, payload: &Value) -> Result<SuggestResponse, ServiceError> {
    let features = features_from_json(payload)?;
    Ok(SuggestResponse {
        suggestions: model.suggest(&features),
    })
}

// ---------------------------------------------------------------------------
// Baseline report
// ---------------------------------------------------------------------------

/// Per-feature values keyed by the capitalized dataset field names, in
/// canonical column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureValues {
    #[serde(rename = "Temperature")]
    pub temperature: f64,
    #[serde(rename = "Humidity")]
    pub humidity: f64,
    #[serde(rename = "Rainfall")]
    pub rainfall: f64,
    #[serde(rename = "Nitrogen")]
    pub nitrogen: f64,
    #[serde(rename = "Potassium")]
    pub potassium: f64,
    #[serde(rename = "Phosphorous")]
    pub phosphorous: f64,
}

impl From<FeatureVector> for FeatureValues {
    fn from(v: FeatureVector) -> Self {
        FeatureValues {
            temperature: v[0],
            humidity: v[1],
            rainfall: v[2],
            nitrogen: v[3],
            potassium: v[4],
            phosphorous: v[5],
        }
    }
}

/// The baseline report: each crop mapped to its mean feature vector,
/// in sorted crop order.
pub fn baseline_report(model: &CropModel) -> BTreeMap<String, FeatureValues> {
    model
        .stats()
        .iter()
        .map(|(crop, agg)| (crop.clone(), FeatureValues::from(agg.mean)))
        .collect()
}

// ---------------------------------------------------------------------------
// Latest sensor readings
// ---------------------------------------------------------------------------

/// Sensor parameters as the dashboard consumes them: lowercase keys under
/// a `parameters` sub-object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameters {
    pub temperature: f64,
    pub humidity: f64,
    pub rainfall: f64,
    pub nitrogen: f64,
    pub potassium: f64,
    pub phosphorous: f64,
}

impl From<FeatureVector> for Parameters {
    fn from(v: FeatureVector) -> Self {
        Parameters {
            temperature: v[0],
            humidity: v[1],
            rainfall: v[2],
            nitrogen: v[3],
            potassium: v[4],
            phosphorous: v[5],
        }
    }
}

/// One latest-per-device entry: reading metadata plus the measurement
/// sub-object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestReading {
    pub device_id: String,
    pub event_time: chrono::DateTime<chrono::Utc>,
    pub source: String,
    pub ingestion_time: chrono::DateTime<chrono::Utc>,
    pub parameters: Parameters,
}

/// Reshapes flat warehouse rows into the latest-sensor payload.
pub fn reshape_latest(readings: Vec<SensorReading>) -> Vec<LatestReading> {
    readings
        .into_iter()
        .map(|r| LatestReading {
            parameters: Parameters::from(r.parameters()),
            device_id: r.device_id,
            event_time: r.event_time,
            source: r.source,
            ingestion_time: r.ingestion_time,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Synthetic readings
// ---------------------------------------------------------------------------

/// One generated reading in a synthetic batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyntheticReading {
    pub crop_type: String,
    pub parameters: Parameters,
}

/// Parses and validates a synthetic batch request: a positive `count` and
/// a `crops` list of strings.
pub fn synthetic_request_from_json(payload: &Value) -> Result<(usize, Vec<String>), ServiceError> {
    let count = payload
        .get("count")
        .ok_or_else(|| ServiceError::MissingField("count".to_string()))?
        .as_i64()
        .ok_or_else(|| ServiceError::InvalidArgument("count must be an integer".to_string()))?;
    if count <= 0 {
        return Err(ServiceError::InvalidArgument(
            "count must be positive".to_string(),
        ));
    }

    let crops = payload
        .get("crops")
        .ok_or_else(|| ServiceError::MissingField("crops".to_string()))?
        .as_array()
        .ok_or_else(|| ServiceError::InvalidArgument("crops must be a list".to_string()))?
        .iter()
        .map(|entry| {
            entry.as_str().map(String::from).ok_or_else(|| {
                ServiceError::InvalidArgument("crops must be a list of strings".to_string())
            })
        })
        .collect::<Result<Vec<String>, ServiceError>>()?;

    Ok((count as usize, crops))
}

/// Builds up to `count` synthetic readings, one per listed crop that the
/// model recognizes. Unknown crops are skipped silently — they are an
/// absent result, not an error.
pub fn build_synthetic_batch(
    model: &CropModel,
    count: usize,
    crops: &[String],
) -> Vec<SyntheticReading> {
    crops
        .iter()
        .filter_map(|crop| {
            model.generate(crop).map(|values| SyntheticReading {
                crop_type: crop.clone(),
                parameters: Parameters::from(values),
            })
        })
        .take(count)
        .collect()
}

/// Records a synthetic batch into the warehouse, best-effort.
///
/// The batch being recorded has already been computed and belongs to the
/// caller's response; a failed insert here is logged and counted but never
/// interrupts that response. Returns (inserted, failed).
pub fn record_batch(repo: &SensorRepository, batch: &[SyntheticReading]) -> (usize, usize) {
    let mut inserted = 0;
    let mut failed = 0;

    for reading in batch {
        let p = &reading.parameters;
        let values = [
            p.temperature,
            p.humidity,
            p.rainfall,
            p.nitrogen,
            p.potassium,
            p.phosphorous,
        ];
        match repo.insert_reading(&reading.crop_type, &values) {
            Ok(()) => inserted += 1,
            Err(err) => {
                failed += 1;
                logging::warn(
                    DataSource::Warehouse,
                    Some(&reading.crop_type),
                    &format!("synthetic reading insert failed: {}", err),
                );
            }
        }
    }

    (inserted, failed)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
