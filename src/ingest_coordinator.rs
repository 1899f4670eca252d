use std::env;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use crate::asset_catalog;
use crate::estimate_log::EstimateLogSink;
use crate::ingest_worker::IngestWorker;
use crate::sensor_reader::{SensorReader, DEFAULT_BAUD_RATE};
use crate::snapshot_store::SnapshotStore;
use crate::weather_data;

/// Wires up the ingest side of the process: reads the environment
/// configuration, loads the reference datasets, and spawns the single
/// background worker. Dataset-level problems (unreadable file, missing
/// required column) fail startup before any ingest cycle runs.
#[derive(Debug)]
pub struct IngestCoordinator {
    snapshot_store: Arc<SnapshotStore>,
}

impl IngestCoordinator {
    pub fn start() -> anyhow::Result<Self> {
        info!("initializing ingest coordinator");

        let catalog_path = env::var("ASSET_CATALOG")
            .context("ASSET_CATALOG env var is required (path to the asset catalog CSV)")?;
        let weather_path = env::var("WEATHER_DATA")
            .context("WEATHER_DATA env var is required (path to the historical weather CSV)")?;
        let sensor_port = env::var("SENSOR_PORT")
            .context("SENSOR_PORT env var is required (path to the sensor's serial device)")?;
        let baud_rate = match env::var("SENSOR_BAUD") {
            Ok(value) => value
                .parse()
                .context("SENSOR_BAUD must be an integer baud rate")?,
            Err(_) => DEFAULT_BAUD_RATE,
        };
        let log_path =
            env::var("ESTIMATE_LOG").unwrap_or_else(|_| "latest_estimate.txt".to_string());

        let catalog = asset_catalog::load_catalog(Path::new(&catalog_path))?;
        if catalog.is_empty() {
            warn!("asset catalog is empty, no estimates will be produced");
        }
        info!(assets = catalog.len(), "loaded asset catalog");

        let weather = weather_data::load_weather(Path::new(&weather_path))?;
        info!(mean_ghi = weather.mean_ghi, "loaded weather aggregate");

        let snapshot_store = Arc::new(SnapshotStore::new());
        let worker = IngestWorker::new(
            SensorReader::new(sensor_port, baud_rate),
            catalog,
            weather,
            snapshot_store.clone(),
            EstimateLogSink::new(log_path),
        );
        worker.spawn();

        Ok(Self { snapshot_store })
    }

    /// Handle for the query surface; the coordinator's worker is the only
    /// writer behind it.
    pub fn snapshot_store(&self) -> Arc<SnapshotStore> {
        self.snapshot_store.clone()
    }
}
