//! Service bootstrap: load configuration, build the crop model from the
//! first usable tabular source, and report readiness.
//!
//! The HTTP layer mounts on top of the library; this binary exists to
//! exercise startup and verify the deployment's data sources end to end.

use agrimon_service::config::{ServiceConfig, WarehouseConfig};
use agrimon_service::engine::CropModel;
use agrimon_service::ingest::{self, TabularSource};
use agrimon_service::ingest::localfile::FileSource;
use agrimon_service::ingest::warehouse::WarehouseSource;
use agrimon_service::logging::{self, DataSource, LogLevel};

const CONFIG_PATH: &str = "./agrimon.toml";

fn main() {
    dotenv::dotenv().ok();
    logging::init_logger(LogLevel::Info, None, true);

    let service_cfg = match ServiceConfig::load(CONFIG_PATH) {
        Ok(cfg) => cfg,
        Err(err) => {
            logging::error(DataSource::System, None, &format!("config: {}", err));
            std::process::exit(1);
        }
    };

    // Warehouse first, local export as fallback. Missing credentials just
    // mean the warehouse source is not registered.
    let mut sources: Vec<Box<dyn TabularSource>> = Vec::new();
    match WarehouseConfig::from_env() {
        Ok(warehouse_cfg) => sources.push(Box::new(WarehouseSource::new(warehouse_cfg))),
        Err(err) => logging::warn(
            DataSource::Warehouse,
            None,
            &format!("warehouse source not configured: {}", err),
        ),
    }
    sources.push(Box::new(FileSource::new(
        &service_cfg.dataset.path,
        service_cfg.dataset.delimiter,
    )));

    let records = match ingest::load_records(&sources) {
        Ok(records) => records,
        Err(err) => {
            logging::error(DataSource::System, None, &err.to_string());
            std::process::exit(1);
        }
    };

    let model = CropModel::fit(records);
    logging::info(
        DataSource::Model,
        None,
        &format!(
            "model ready: {} records, {} crops",
            model.record_count(),
            model.crop_count()
        ),
    );

    for (crop, agg) in model.stats().iter() {
        logging::info(
            DataSource::Model,
            Some(crop),
            &format!(
                "{} records, temperature {:.1}..{:.1}, rainfall {:.1}..{:.1}",
                agg.count, agg.min[0], agg.max[0], agg.min[2], agg.max[2]
            ),
        );
    }
}
