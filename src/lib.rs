//! Solar Estimate Bridge Library
//!
//! This library provides a threaded architecture for turning a live irradiance
//! sensor stream into per-asset energy and cost-savings estimates, publishing
//! the most recent estimate for concurrent HTTP readers.

pub mod asset_catalog;
pub mod estimate_log;
pub mod estimator;
pub mod ingest_coordinator;
pub mod ingest_worker;
pub mod query_api;
pub mod sensor_reader;
pub mod snapshot_store;
pub mod weather_data;

// Re-export commonly used types for easier access
pub use asset_catalog::AssetRecord;
pub use estimate_log::EstimateLogSink;
pub use estimator::Estimate;
pub use ingest_coordinator::IngestCoordinator;
pub use ingest_worker::IngestWorker;
pub use sensor_reader::{ReadError, SensorReader, SensorReading};
pub use snapshot_store::SnapshotStore;
pub use weather_data::WeatherAggregate;
