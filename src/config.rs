/// Service configuration.
///
/// Two layers, matching how the deployment supplies settings:
///   - warehouse credentials come from the environment (via dotenv), so
///     secrets never live in a checked-in file;
///   - non-secret settings (fallback dataset path, delimiter) come from an
///     optional `agrimon.toml` next to the binary.

use serde::Deserialize;
use std::env;

use crate::model::ServiceError;

// ---------------------------------------------------------------------------
// Warehouse connection
// ---------------------------------------------------------------------------

/// Connection settings for the analytical warehouse.
///
/// The `schema` is the namespace holding the curated tables
/// (`crops_data_curated`, `sensor_readings_curated`); the database selected
/// at connect time plays the role of the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct WarehouseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
    pub schema: String,
}

impl WarehouseConfig {
    /// Reads the connection settings from the environment.
    ///
    /// Required: WAREHOUSE_HOST, WAREHOUSE_USER, WAREHOUSE_PASSWORD,
    /// WAREHOUSE_DBNAME. Optional: WAREHOUSE_PORT (default 5432),
    /// WAREHOUSE_SCHEMA (default "public").
    pub fn from_env() -> Result<Self, ServiceError> {
        Ok(WarehouseConfig {
            host: require_env("WAREHOUSE_HOST")?,
            port: match env::var("WAREHOUSE_PORT") {
                Ok(raw) => raw.parse().map_err(|_| {
                    ServiceError::InvalidArgument(format!(
                        "WAREHOUSE_PORT must be a port number, got '{}'",
                        raw
                    ))
                })?,
                Err(_) => 5432,
            },
            user: require_env("WAREHOUSE_USER")?,
            password: require_env("WAREHOUSE_PASSWORD")?,
            dbname: require_env("WAREHOUSE_DBNAME")?,
            schema: env::var("WAREHOUSE_SCHEMA").unwrap_or_else(|_| "public".to_string()),
        })
    }

    /// Connection string in the key/value form the postgres client accepts.
    pub fn conn_string(&self) -> String {
        format!(
            "host={} port={} user={} password={} dbname={}",
            self.host, self.port, self.user, self.password, self.dbname
        )
    }

    /// Fully qualified table name within the configured namespace.
    pub fn qualified(&self, table: &str) -> String {
        format!("{}.{}", self.schema, table)
    }
}

fn require_env(name: &str) -> Result<String, ServiceError> {
    env::var(name)
        .map_err(|_| ServiceError::InvalidArgument(format!("{} is not set", name)))
}

// ---------------------------------------------------------------------------
// Service settings file
// ---------------------------------------------------------------------------

/// Settings for the local fallback dataset file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DatasetConfig {
    /// Path to the delimited crop dataset used when the warehouse is down.
    #[serde(default = "default_dataset_path")]
    pub path: String,
    /// Column delimiter. The curated export uses semicolons.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_dataset_path() -> String {
    "crops.csv".to_string()
}

fn default_delimiter() -> char {
    ';'
}

impl Default for DatasetConfig {
    fn default() -> Self {
        DatasetConfig {
            path: default_dataset_path(),
            delimiter: default_delimiter(),
        }
    }
}

/// Top-level service settings parsed from `agrimon.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub dataset: DatasetConfig,
}

impl ServiceConfig {
    /// Loads settings from a toml file. A missing file is not an error —
    /// defaults apply. A file that exists but does not parse is an error,
    /// since silently ignoring a broken config hides operator mistakes.
    pub fn load(path: &str) -> Result<Self, ServiceError> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                toml::from_str(&text).map_err(|e| ServiceError::Parse(format!("{}: {}", path, e)))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ServiceConfig::default()),
            Err(e) => Err(ServiceError::SourceUnavailable(format!("{}: {}", path, e))),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_warehouse() -> WarehouseConfig {
        WarehouseConfig {
            host: "localhost".to_string(),
            port: 5432,
            user: "agrimon".to_string(),
            password: "secret".to_string(),
            dbname: "workspace".to_string(),
            schema: "curated".to_string(),
        }
    }

    #[test]
    fn test_conn_string_contains_all_parts() {
        let cfg = sample_warehouse();
        let conn = cfg.conn_string();
        assert!(conn.contains("host=localhost"));
        assert!(conn.contains("port=5432"));
        assert!(conn.contains("dbname=workspace"));
    }

    #[test]
    fn test_qualified_table_name_uses_schema() {
        let cfg = sample_warehouse();
        assert_eq!(
            cfg.qualified("sensor_readings_curated"),
            "curated.sensor_readings_curated"
        );
    }

    #[test]
    fn test_dataset_defaults() {
        let cfg = DatasetConfig::default();
        assert_eq!(cfg.path, "crops.csv");
        assert_eq!(cfg.delimiter, ';');
    }

    #[test]
    fn test_service_config_parses_toml() {
        let cfg: ServiceConfig = toml::from_str(
            r#"
            [dataset]
            path = "data/crops_export.csv"
            delimiter = ","
            "#,
        )
        .expect("valid toml should parse");
        assert_eq!(cfg.dataset.path, "data/crops_export.csv");
        assert_eq!(cfg.dataset.delimiter, ',');
    }

    #[test]
    fn test_missing_config_file_falls_back_to_defaults() {
        let cfg = ServiceConfig::load("/nonexistent/agrimon.toml")
            .expect("missing file should yield defaults");
        assert_eq!(cfg, ServiceConfig::default());
    }

    #[test]
    fn test_broken_config_file_is_an_error() {
        let path = std::env::temp_dir().join("agrimon_broken_config.toml");
        std::fs::write(&path, "[dataset\npath = ").unwrap();
        let result = ServiceConfig::load(path.to_str().unwrap());
        assert!(
            matches!(result, Err(ServiceError::Parse(_))),
            "unparseable config must fail loudly, got {:?}",
            result
        );
        let _ = std::fs::remove_file(&path);
    }
}
