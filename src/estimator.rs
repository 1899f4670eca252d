use chrono::{DateTime, Utc};
use serde_derive::{Deserialize, Serialize};

/// PV module efficiency (18%)
pub const MODULE_EFFICIENCY: f64 = 0.18;
/// Inverter efficiency (95%)
pub const INVERTER_EFFICIENCY: f64 = 0.95;
/// Electricity rate in CAD per kWh (Ontario, 2024)
pub const ELECTRICITY_RATE_CAD_PER_KWH: f64 = 0.13;

/// One published result: the energy output and cost savings computed for a
/// single asset from a single sensor reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub timestamp: DateTime<Utc>,
    pub asset_name: String,
    pub energy_output_kwh: f64,
    pub cost_savings_cad: f64,
}

/// Energy output in kWh for one asset.
///
/// The instantaneous irradiance is tilt-corrected, then blended 50/50 with
/// the historical mean GHI. Orientation is carried on the asset record but
/// has no effect on this formula; the correction term for it has not been
/// decided. Negative or zero inputs pass through unmodified.
pub fn energy_output_kwh(
    irradiance: f64,
    footprint_area: f64,
    tilt_degrees: f64,
    mean_ghi: f64,
) -> f64 {
    let tilt_adjusted = irradiance * tilt_degrees.to_radians().cos();
    let effective_irradiance = (tilt_adjusted + mean_ghi) / 2.0;
    footprint_area * effective_irradiance * MODULE_EFFICIENCY * INVERTER_EFFICIENCY
}

/// Cost savings in CAD for a given energy output.
pub fn cost_savings_cad(energy_output_kwh: f64) -> f64 {
    energy_output_kwh * ELECTRICITY_RATE_CAD_PER_KWH
}
