use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context};

/// Aggregate historical-weather baseline, derived once at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherAggregate {
    /// Arithmetic mean of the dataset's Global Horizontal Irradiance column.
    pub mean_ghi: f64,
}

/// Loads the historical weather CSV and reduces it to its mean GHI.
///
/// The `GHI` column (matched after trimming surrounding whitespace) is
/// required; its absence, or a dataset with no numeric GHI cells at all, is
/// a fatal startup error.
pub fn load_weather(path: &Path) -> anyhow::Result<WeatherAggregate> {
    let file =
        File::open(path).with_context(|| format!("failed to open weather data {}", path.display()))?;
    parse_weather(file).with_context(|| format!("failed to load weather data {}", path.display()))
}

fn parse_weather<R: Read>(reader: R) -> anyhow::Result<WeatherAggregate> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let Some(ghi_column) = headers.iter().position(|header| header.trim() == "GHI") else {
        bail!("no 'GHI' column found in the weather data");
    };

    let mut sum = 0.0;
    let mut count = 0u64;
    for row in csv_reader.records() {
        let row = row?;
        if let Some(value) = row.get(ghi_column).and_then(|cell| cell.trim().parse::<f64>().ok()) {
            sum += value;
            count += 1;
        }
    }
    if count == 0 {
        bail!("weather data contains no usable GHI samples");
    }

    Ok(WeatherAggregate {
        mean_ghi: sum / count as f64,
    })
}
