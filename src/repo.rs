/// Sensor repository: query layer over the curated warehouse tables.
///
/// Tables expected (in the configured schema):
///   - `sensor_readings_curated`
///   - `crops_data_curated`
///
/// Every read opens a fresh connection, runs one parameterized statement,
/// and materializes all result rows before the connection drops — no
/// pooling, no streaming, no automatic retries. A failed query is surfaced
/// to the caller as-is.

use chrono::{DateTime, Utc};
use postgres::types::ToSql;
use postgres::{Client, NoTls, Row};

use crate::config::WarehouseConfig;
use crate::model::{CropRecord, FeatureVector, SensorReading, ServiceError};

/// History queries are capped to protect the warehouse. The limit the
/// caller supplies must fall in [1, MAX_HISTORY_LIMIT].
pub const MAX_HISTORY_LIMIT: i64 = 50_000;

const READING_COLUMNS: &str = "event_time, device_id, temperature, humidity, rainfall, \
                               nitrogen, potassium, phosphorous, source, ingestion_time";

pub struct SensorRepository {
    cfg: WarehouseConfig,
}

impl SensorRepository {
    pub fn new(cfg: WarehouseConfig) -> Self {
        SensorRepository { cfg }
    }

    fn connect(&self) -> Result<Client, ServiceError> {
        Ok(Client::connect(&self.cfg.conn_string(), NoTls)?)
    }

    // ---------- public API ----------

    /// The full crop reference table, ordered by crop type.
    pub fn get_all_crops(&self) -> Result<Vec<CropRecord>, ServiceError> {
        let query = format!(
            "SELECT temperature, humidity, rainfall, nitrogen, potassium, phosphorous, crop_type \
             FROM {} ORDER BY crop_type",
            self.cfg.qualified("crops_data_curated")
        );

        let mut client = self.connect()?;
        let rows = client.query(&query, &[])?;

        Ok(rows
            .iter()
            .map(|row| CropRecord {
                temperature: row.get(0),
                humidity: row.get(1),
                rainfall: row.get(2),
                nitrogen: row.get(3),
                potassium: row.get(4),
                phosphorous: row.get(5),
                crop_type: row.get(6),
            })
            .collect())
    }

    /// Exactly one most-recent reading per distinct device, ordered by
    /// device id. Recency is (event_time desc, ingestion_time desc).
    pub fn get_latest_per_device(&self) -> Result<Vec<SensorReading>, ServiceError> {
        let query = format!(
            "WITH ranked AS ( \
               SELECT *, ROW_NUMBER() OVER ( \
                 PARTITION BY device_id \
                 ORDER BY event_time DESC, ingestion_time DESC \
               ) AS rn \
               FROM {} \
             ) \
             SELECT {} FROM ranked WHERE rn = 1 ORDER BY device_id",
            self.cfg.qualified("sensor_readings_curated"),
            READING_COLUMNS
        );

        let mut client = self.connect()?;
        let rows = client.query(&query, &[])?;
        Ok(rows.iter().map(reading_from_row).collect())
    }

    /// Readings with event_time in `[from_ts, to_ts)`, optionally filtered
    /// to one device, capped at `limit` rows.
    ///
    /// The limit is validated before any connection is opened. `order` is
    /// normalized: "desc" (any case) sorts newest-first, anything else
    /// sorts oldest-first.
    pub fn get_history(
        &self,
        from_ts: DateTime<Utc>,
        to_ts: DateTime<Utc>,
        device_id: Option<&str>,
        limit: i64,
        order: &str,
    ) -> Result<Vec<SensorReading>, ServiceError> {
        if limit <= 0 || limit > MAX_HISTORY_LIMIT {
            return Err(ServiceError::InvalidArgument(format!(
                "limit must be between 1 and {}",
                MAX_HISTORY_LIMIT
            )));
        }

        let query = format!(
            "SELECT {} FROM {} \
             WHERE event_time >= $1 \
               AND event_time <  $2 \
               AND ($3::text IS NULL OR device_id = $3) \
             ORDER BY event_time {} \
             LIMIT $4",
            READING_COLUMNS,
            self.cfg.qualified("sensor_readings_curated"),
            order_keyword(order)
        );

        let params: [&(dyn ToSql + Sync); 4] = [&from_ts, &to_ts, &device_id, &limit];

        let mut client = self.connect()?;
        let rows = client.query(&query, &params)?;
        Ok(rows.iter().map(reading_from_row).collect())
    }

    /// Appends one synthetic reading. Best-effort by contract: callers on
    /// the read path log a failure here and return their result anyway.
    pub fn insert_reading(
        &self,
        crop_name: &str,
        parameters: &FeatureVector,
    ) -> Result<(), ServiceError> {
        let query = format!(
            "INSERT INTO {} ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
            self.cfg.qualified("sensor_readings_curated"),
            READING_COLUMNS
        );

        let now = Utc::now();
        let device_id = synthetic_device_id(crop_name);

        let mut client = self.connect()?;
        client.execute(
            &query,
            &[
                &now,
                &device_id,
                &parameters[0],
                &parameters[1],
                &parameters[2],
                &parameters[3],
                &parameters[4],
                &parameters[5],
                &"synthetic",
                &now,
            ],
        )?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Normalizes the caller's sort direction. Only "desc" (case-insensitive)
/// selects descending; every other value sorts ascending. This forgiving
/// normalization is part of the query contract and must be preserved.
pub fn order_keyword(order: &str) -> &'static str {
    if order.eq_ignore_ascii_case("desc") {
        "DESC"
    } else {
        "ASC"
    }
}

/// Device identity stamped onto synthetic readings: "synthetic-" plus the
/// lowercased crop name with spaces collapsed to hyphens.
pub fn synthetic_device_id(crop_name: &str) -> String {
    let slug: String = crop_name
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    format!("synthetic-{}", slug)
}

fn reading_from_row(row: &Row) -> SensorReading {
    SensorReading {
        event_time: row.get(0),
        device_id: row.get(1),
        temperature: row.get(2),
        humidity: row.get(3),
        rainfall: row.get(4),
        nitrogen: row.get(5),
        potassium: row.get(6),
        phosphorous: row.get(7),
        source: row.get(8),
        ingestion_time: row.get(9),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Repository wired to an address no connection can reach. Used to
    /// prove that argument validation fires before any connection attempt.
    fn unreachable_repo() -> SensorRepository {
        SensorRepository::new(WarehouseConfig {
            host: "256.256.256.256".to_string(),
            port: 1,
            user: "nobody".to_string(),
            password: "nothing".to_string(),
            dbname: "nowhere".to_string(),
            schema: "public".to_string(),
        })
    }

    #[test]
    fn test_zero_limit_rejected_before_any_query() {
        let repo = unreachable_repo();
        let result = repo.get_history(Utc::now(), Utc::now(), None, 0, "desc");
        assert!(
            matches!(result, Err(ServiceError::InvalidArgument(_))),
            "limit 0 must fail fast as InvalidArgument, got {:?}",
            result
        );
    }

    #[test]
    fn test_over_cap_limit_rejected_before_any_query() {
        let repo = unreachable_repo();
        let result = repo.get_history(Utc::now(), Utc::now(), None, MAX_HISTORY_LIMIT + 1, "desc");
        assert!(
            matches!(result, Err(ServiceError::InvalidArgument(_))),
            "limit {} must fail fast as InvalidArgument, got {:?}",
            MAX_HISTORY_LIMIT + 1,
            result
        );
    }

    #[test]
    fn test_limit_at_cap_passes_validation() {
        // With a valid limit the unreachable repo fails at the connection,
        // which surfaces as a query error — not as InvalidArgument.
        let repo = unreachable_repo();
        let result = repo.get_history(Utc::now(), Utc::now(), None, MAX_HISTORY_LIMIT, "desc");
        assert!(
            matches!(result, Err(ServiceError::Query(_))),
            "limit at the cap must reach the connection stage, got {:?}",
            result
        );
    }

    #[test]
    fn test_order_keyword_normalization() {
        assert_eq!(order_keyword("desc"), "DESC");
        assert_eq!(order_keyword("DESC"), "DESC");
        assert_eq!(order_keyword("Desc"), "DESC");
        // Anything that is not "desc" sorts ascending, including junk.
        assert_eq!(order_keyword("asc"), "ASC");
        assert_eq!(order_keyword("ascending"), "ASC");
        assert_eq!(order_keyword(""), "ASC");
        assert_eq!(order_keyword("newest"), "ASC");
    }

    #[test]
    fn test_synthetic_device_id_slug() {
        assert_eq!(synthetic_device_id("Wheat"), "synthetic-wheat");
        assert_eq!(synthetic_device_id("Sugar Cane"), "synthetic-sugar-cane");
        assert_eq!(synthetic_device_id("  Rice  "), "synthetic-rice");
    }
}
