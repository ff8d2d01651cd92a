/// Warehouse-backed tabular source for the curated crop dataset.
///
/// The primary provider. Opens a fresh connection per call, runs one
/// parameterless read of `crops_data_curated`, and materializes all rows
/// before the connection drops. Columns arrive nullable — coercion to
/// missing happens here so validation can drop incomplete rows the same
/// way it does for the file provider.

use postgres::{Client, NoTls};

use crate::config::WarehouseConfig;
use crate::logging::DataSource;
use crate::model::{RawCropRow, ServiceError};

use super::TabularSource;

pub struct WarehouseSource {
    cfg: WarehouseConfig,
}

impl WarehouseSource {
    pub fn new(cfg: WarehouseConfig) -> Self {
        WarehouseSource { cfg }
    }

    fn connect(&self) -> Result<Client, postgres::Error> {
        Client::connect(&self.cfg.conn_string(), NoTls)
    }
}

impl TabularSource for WarehouseSource {
    fn name(&self) -> &'static str {
        "analytical warehouse"
    }

    fn tag(&self) -> DataSource {
        DataSource::Warehouse
    }

    fn probe(&self) -> bool {
        match self.connect() {
            Ok(mut client) => client.simple_query("SELECT 1").is_ok(),
            Err(_) => false,
        }
    }

    fn fetch_rows(&self) -> Result<Vec<RawCropRow>, ServiceError> {
        let query = format!(
            "SELECT temperature, humidity, rainfall, nitrogen, potassium, phosphorous, crop_type \
             FROM {} ORDER BY crop_type",
            self.cfg.qualified("crops_data_curated")
        );

        let mut client = self.connect()?;
        let rows = client.query(&query, &[])?;

        let finite = |value: Option<f64>| value.filter(|v| v.is_finite());

        let mut raw = Vec::with_capacity(rows.len());
        for row in rows {
            raw.push(RawCropRow {
                temperature: finite(row.get(0)),
                humidity: finite(row.get(1)),
                rainfall: finite(row.get(2)),
                nitrogen: finite(row.get(3)),
                potassium: finite(row.get(4)),
                phosphorous: finite(row.get(5)),
                crop_type: row
                    .get::<_, Option<String>>(6)
                    .filter(|label| !label.trim().is_empty()),
            });
        }

        Ok(raw)
    }
}
