use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::asset_catalog::AssetRecord;
use crate::estimate_log::EstimateLogSink;
use crate::estimator::{self, Estimate};
use crate::sensor_reader::{SensorReader, SensorReading};
use crate::snapshot_store::SnapshotStore;
use crate::weather_data::WeatherAggregate;

/// Pause between failed device reads. Retries continue indefinitely; the
/// pause only keeps an unplugged device from spinning the loop hot.
const READ_RETRY_PAUSE: Duration = Duration::from_secs(1);

/// The single background worker driving the ingest cycle:
/// read one sensor sample, estimate every cataloged asset, publish each
/// estimate to the snapshot store and the overwrite log.
///
/// This worker owns the only write access to both sinks.
pub struct IngestWorker {
    reader: SensorReader,
    catalog: Vec<AssetRecord>,
    weather: WeatherAggregate,
    store: Arc<SnapshotStore>,
    log_sink: EstimateLogSink,
}

impl IngestWorker {
    pub fn new(
        reader: SensorReader,
        catalog: Vec<AssetRecord>,
        weather: WeatherAggregate,
        store: Arc<SnapshotStore>,
        log_sink: EstimateLogSink,
    ) -> Self {
        Self {
            reader,
            catalog,
            weather,
            store,
            log_sink,
        }
    }

    /// Spawns the worker in its own task for the lifetime of the process.
    pub fn spawn(self) {
        tokio::spawn(async move {
            let mut worker = self;
            worker.run().await;
        });
    }

    async fn run(&mut self) {
        info!(assets = self.catalog.len(), "starting ingest worker");

        let mut consecutive_errors = 0u32;
        loop {
            let reading = match self.reader.read_reading().await {
                Ok(reading) => {
                    if consecutive_errors > 0 {
                        info!(
                            failed_attempts = consecutive_errors,
                            "device recovered"
                        );
                    }
                    consecutive_errors = 0;
                    reading
                }
                Err(error) => {
                    consecutive_errors += 1;
                    warn!(%error, attempts = consecutive_errors, "device read failed, retrying");
                    sleep(READ_RETRY_PAUSE).await;
                    continue;
                }
            };

            self.process_reading(&reading).await;
        }
    }

    /// One compute-and-publish pass over the catalog for a single reading.
    ///
    /// A row without a usable footprint is skipped with a warning; it never
    /// aborts the cycle. Log-sink failures are warned and do not roll back
    /// the snapshot publish.
    pub async fn process_reading(&self, reading: &SensorReading) {
        for asset in &self.catalog {
            let footprint_area = match asset.footprint_area {
                Some(area) => area,
                None => {
                    warn!(asset = %asset.name, "asset row has no usable footprint, skipping");
                    continue;
                }
            };

            let energy_output_kwh = estimator::energy_output_kwh(
                reading.irradiance,
                footprint_area,
                asset.tilt_degrees,
                self.weather.mean_ghi,
            );
            let estimate = Estimate {
                timestamp: Utc::now(),
                asset_name: asset.name.clone(),
                energy_output_kwh,
                cost_savings_cad: estimator::cost_savings_cad(energy_output_kwh),
            };

            info!(
                asset = %estimate.asset_name,
                energy_kwh = estimate.energy_output_kwh,
                savings_cad = estimate.cost_savings_cad,
                "publishing estimate"
            );
            self.store.publish(estimate.clone());

            if let Err(error) = self.log_sink.write(&estimate).await {
                warn!("failed to update estimate log: {error:#}");
            }
        }
    }
}
