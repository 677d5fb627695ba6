//! CSV ingestion for the district dataset.
//!
//! Columns are classified by header name, never by position: `State` and
//! `District` are identifiers, `Latitude` and `Longitude` are coordinates,
//! and every remaining column is a numeric measure. Empty or non-numeric
//! measure cells become missing values.

use std::io::Read;
use std::path::Path;

use log::{debug, info};

use super::error::{DataError, DataResult};
use super::table::{DistrictRecord, Table};

const STATE_COLUMN: &str = "State";
const DISTRICT_COLUMN: &str = "District";
const LATITUDE_COLUMN: &str = "Latitude";
const LONGITUDE_COLUMN: &str = "Longitude";

/// Load the dataset from a CSV file on disk.
///
/// Fails with a terminal [`DataError::Load`] if the file is absent or any
/// row violates the schema invariants (empty identifiers, unparseable
/// coordinates).
pub fn load_table(path: impl AsRef<Path>) -> DataResult<Table> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DataError::load(format!(
            "dataset file not found: {}",
            path.display()
        )));
    }

    let file = std::fs::File::open(path)?;
    let table = read_table(file)?;
    info!(
        "Loaded dataset from {}: {} rows, {} measure columns",
        path.display(),
        table.len(),
        table.measure_columns().len()
    );
    Ok(table)
}

/// Parse the dataset from any reader. Used by [`load_table`] and by tests.
pub fn read_table(reader: impl Read) -> DataResult<Table> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let state_idx = required_column(&headers, STATE_COLUMN)?;
    let district_idx = required_column(&headers, DISTRICT_COLUMN)?;
    let latitude_idx = required_column(&headers, LATITUDE_COLUMN)?;
    let longitude_idx = required_column(&headers, LONGITUDE_COLUMN)?;

    // Everything that is not an identifier or coordinate is a measure.
    let reserved = [state_idx, district_idx, latitude_idx, longitude_idx];
    let measure_indices: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| !reserved.contains(i))
        .map(|(i, name)| (i, name.to_string()))
        .collect();
    let measure_columns: Vec<String> =
        measure_indices.iter().map(|(_, name)| name.clone()).collect();

    let mut rows = Vec::new();
    for (row_number, result) in csv_reader.records().enumerate() {
        let record = result?;
        let line = row_number + 2; // 1-based, after the header row

        let state = required_cell(&record, state_idx, STATE_COLUMN, line)?;
        let district = required_cell(&record, district_idx, DISTRICT_COLUMN, line)?;
        let latitude = coordinate_cell(&record, latitude_idx, LATITUDE_COLUMN, line)?;
        let longitude = coordinate_cell(&record, longitude_idx, LONGITUDE_COLUMN, line)?;

        let mut measures = std::collections::BTreeMap::new();
        for (idx, name) in &measure_indices {
            let raw = record.get(*idx).unwrap_or("").trim();
            let value = if raw.is_empty() {
                None
            } else {
                match raw.parse::<f64>() {
                    Ok(v) => Some(v),
                    Err(_) => {
                        debug!("Non-numeric cell in column {} at line {}: {:?}", name, line, raw);
                        None
                    }
                }
            };
            measures.insert(name.clone(), value);
        }

        rows.push(DistrictRecord {
            state,
            district,
            latitude,
            longitude,
            measures,
        });
    }

    Ok(Table::new(measure_columns, rows))
}

fn required_column(headers: &csv::StringRecord, name: &str) -> DataResult<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| DataError::load(format!("missing required column: {}", name)))
}

fn required_cell(
    record: &csv::StringRecord,
    idx: usize,
    column: &str,
    line: usize,
) -> DataResult<String> {
    let value = record.get(idx).unwrap_or("").trim();
    if value.is_empty() {
        return Err(DataError::load(format!(
            "empty {} value at line {}",
            column, line
        )));
    }
    Ok(value.to_string())
}

fn coordinate_cell(
    record: &csv::StringRecord,
    idx: usize,
    column: &str,
    line: usize,
) -> DataResult<f64> {
    let raw = record.get(idx).unwrap_or("").trim();
    raw.parse::<f64>().map_err(|_| {
        DataError::load(format!(
            "invalid {} value at line {}: {:?}",
            column, line, raw
        ))
    })
}
