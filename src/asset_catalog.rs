use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, Context};
use csv::StringRecord;
use tracing::warn;

/// One row of the asset catalog.
///
/// `footprint_area` stays `None` when the row's cell is blank or not a
/// number; such rows are kept in the catalog and skipped per ingest cycle
/// rather than dropped at load. Tilt and orientation default to 0 when the
/// column or cell is absent.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetRecord {
    pub name: String,
    pub footprint_area: Option<f64>,
    pub tilt_degrees: f64,
    pub orientation_degrees: f64,
}

/// Loads the asset catalog CSV.
///
/// Required columns (matched after trimming surrounding whitespace):
/// `Model Name` and `Footprint`. Optional: `Tilt (degrees)`, `Orientation`.
/// A missing required column is a fatal startup error.
pub fn load_catalog(path: &Path) -> anyhow::Result<Vec<AssetRecord>> {
    let file =
        File::open(path).with_context(|| format!("failed to open asset catalog {}", path.display()))?;
    parse_catalog(file).with_context(|| format!("failed to load asset catalog {}", path.display()))
}

fn parse_catalog<R: Read>(reader: R) -> anyhow::Result<Vec<AssetRecord>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let name_column = find_column(&headers, "Model Name")
        .ok_or_else(|| anyhow!("asset catalog is missing the 'Model Name' column"))?;
    let footprint_column = find_column(&headers, "Footprint")
        .ok_or_else(|| anyhow!("asset catalog is missing the 'Footprint' column"))?;
    let tilt_column = find_column(&headers, "Tilt (degrees)");
    let orientation_column = find_column(&headers, "Orientation");

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        let name = row.get(name_column).unwrap_or_default().trim();
        if name.is_empty() {
            warn!("dropping asset catalog row without a model name");
            continue;
        }
        records.push(AssetRecord {
            name: name.to_string(),
            footprint_area: parse_cell(&row, footprint_column),
            tilt_degrees: tilt_column
                .and_then(|column| parse_cell(&row, column))
                .unwrap_or(0.0),
            orientation_degrees: orientation_column
                .and_then(|column| parse_cell(&row, column))
                .unwrap_or(0.0),
        });
    }
    Ok(records)
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|header| header.trim() == name)
}

fn parse_cell(row: &StringRecord, index: usize) -> Option<f64> {
    row.get(index)?.trim().parse().ok()
}
