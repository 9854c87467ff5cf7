//! Host-side input loading
//!
//! Reads the records the engine works on from files produced by the
//! dashboard or by hand: locations as JSON, consumption profiles as CSV or
//! as the dashboard's `"day_hour"`-keyed JSON map, and insolation series as
//! CSV. Every record is validated on the way in, so errors point at the
//! offending line rather than surfacing later in aggregation.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use tracing::debug;

use crate::engine::ConsumptionGrid;
use crate::error::{ProsumerError, ProsumerResult};
use crate::models::{validate_primary, ConsumptionSlot, InsolationSample, Location, LocationId};

/// Columns expected in a consumption CSV
pub const CONSUMPTION_COLUMNS: [&str; 3] = ["day_of_week", "hour", "consumption_kwh"];

/// Columns expected in an insolation CSV
pub const INSOLATION_COLUMNS: [&str; 4] = ["city", "date", "hour", "insolation_percentage"];

#[derive(Deserialize)]
#[serde(untagged)]
enum LocationFile {
    Many(Vec<Location>),
    One(Location),
}

#[derive(Deserialize)]
struct ConsumptionRecord {
    day_of_week: u8,
    hour: u8,
    consumption_kwh: f64,
}

#[derive(Deserialize)]
struct InsolationRecord {
    city: String,
    date: String,
    hour: u8,
    insolation_percentage: f64,
}

fn open(path: &Path) -> ProsumerResult<BufReader<File>> {
    let file = File::open(path).map_err(|e| {
        ProsumerError::Import(format!("Failed to open {}: {}", path.display(), e))
    })?;
    Ok(BufReader::new(file))
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

/// Read one location or a list of locations from JSON
pub fn read_locations<R: Read>(reader: R) -> ProsumerResult<Vec<Location>> {
    let parsed: LocationFile = serde_json::from_reader(reader)
        .map_err(|e| ProsumerError::Import(format!("Invalid location JSON: {}", e)))?;

    let locations = match parsed {
        LocationFile::Many(list) => list,
        LocationFile::One(location) => vec![location],
    };

    for location in &locations {
        location.validate()?;
    }
    validate_primary(&locations)?;

    Ok(locations)
}

/// Load locations from a JSON file
pub fn load_locations(path: &Path) -> ProsumerResult<Vec<Location>> {
    read_locations(open(path)?)
}

/// Read a consumption profile from CSV (`day_of_week,hour,consumption_kwh`)
pub fn read_consumption_csv<R: Read>(
    reader: R,
    location_id: LocationId,
) -> ProsumerResult<Vec<ConsumptionSlot>> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    check_headers(rdr.headers()?, &CONSUMPTION_COLUMNS)?;

    let mut slots = Vec::new();
    for (index, result) in rdr.deserialize::<ConsumptionRecord>().enumerate() {
        let line = index + 2;
        let record = result
            .map_err(|e| ProsumerError::Import(format!("Consumption line {}: {}", line, e)))?;

        let slot = ConsumptionSlot::new(
            location_id,
            record.day_of_week,
            record.hour,
            record.consumption_kwh,
        )
        .map_err(|e| line_error("Consumption", line, e))?;
        slots.push(slot);
    }

    debug!(slots = slots.len(), "read consumption CSV");
    Ok(slots)
}

/// Read a consumption profile from the dashboard's `{"day_hour": kWh}` map
///
/// Keys that do not decode are skipped, matching how the dashboard tolerates
/// half-edited grid state.
pub fn read_consumption_grid_json<R: Read>(
    reader: R,
    location_id: LocationId,
) -> ProsumerResult<Vec<ConsumptionSlot>> {
    let map: BTreeMap<String, f64> = serde_json::from_reader(reader)
        .map_err(|e| ProsumerError::Import(format!("Invalid consumption grid JSON: {}", e)))?;

    let grid = ConsumptionGrid::from_keyed_values(map)?;
    debug!(slots = grid.len(), "read consumption grid JSON");
    Ok(grid.to_slot_list(location_id))
}

/// Load a consumption profile, choosing the format by file extension
pub fn load_consumption(path: &Path, location_id: LocationId) -> ProsumerResult<Vec<ConsumptionSlot>> {
    let reader = open(path)?;
    if is_json(path) {
        read_consumption_grid_json(reader, location_id)
    } else {
        read_consumption_csv(reader, location_id)
    }
}

/// Read insolation samples from CSV (`city,date,hour,insolation_percentage`)
pub fn read_insolation_csv<R: Read>(
    reader: R,
    date_format: &str,
) -> ProsumerResult<Vec<InsolationSample>> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    check_headers(rdr.headers()?, &INSOLATION_COLUMNS)?;

    let mut samples = Vec::new();
    for (index, result) in rdr.deserialize::<InsolationRecord>().enumerate() {
        let line = index + 2;
        let record = result
            .map_err(|e| ProsumerError::Import(format!("Insolation line {}: {}", line, e)))?;

        let date = NaiveDate::parse_from_str(&record.date, date_format).map_err(|_| {
            ProsumerError::Import(format!(
                "Insolation line {}: invalid date '{}' (expected {})",
                line, record.date, date_format
            ))
        })?;

        let sample = InsolationSample::new(
            record.city,
            date,
            record.hour,
            record.insolation_percentage,
        )
        .map_err(|e| line_error("Insolation", line, e))?;
        samples.push(sample);
    }

    debug!(samples = samples.len(), "read insolation CSV");
    Ok(samples)
}

/// Load insolation samples from a CSV file
pub fn load_insolation(path: &Path, date_format: &str) -> ProsumerResult<Vec<InsolationSample>> {
    read_insolation_csv(open(path)?, date_format)
}

fn check_headers(headers: &StringRecord, expected: &[&str]) -> ProsumerResult<()> {
    let missing: Vec<&str> = expected
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .copied()
        .collect();

    if !missing.is_empty() {
        return Err(ProsumerError::Import(format!(
            "Missing column(s): {}. Expected header: {}",
            missing.join(", "),
            expected.join(",")
        )));
    }
    Ok(())
}

fn line_error(kind: &str, line: usize, err: ProsumerError) -> ProsumerError {
    match err {
        ProsumerError::Validation(msg) => {
            ProsumerError::Validation(format!("{} line {}: {}", kind, line, msg))
        }
        other => other,
    }
}
