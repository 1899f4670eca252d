use std::path::PathBuf;

use anyhow::Context;

use crate::estimator::Estimate;

/// Durable single-record sink holding the most recent estimate.
///
/// Each write replaces the whole file; there is no history. Write failures
/// are the caller's to log, and never affect the in-memory snapshot.
pub struct EstimateLogSink {
    path: PathBuf,
}

impl EstimateLogSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn write(&self, estimate: &Estimate) -> anyhow::Result<()> {
        tokio::fs::write(&self.path, format_record(estimate))
            .await
            .with_context(|| format!("failed to write estimate log {}", self.path.display()))?;
        Ok(())
    }
}

/// Human-readable one-line report form of an estimate.
pub fn format_record(estimate: &Estimate) -> String {
    format!(
        "{} | Asset: {} | Energy Output: {:.2} kWh | Cost Savings: ${:.2} CAD\n",
        estimate.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        estimate.asset_name,
        estimate.energy_output_kwh,
        estimate.cost_savings_cad,
    )
}
