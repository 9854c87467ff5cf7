//! CSV Export functionality
//!
//! Serializes a [`ReportData`] into a flat hourly table. Column order and
//! number formatting are fixed so exports are stable and diffable.
//!
//! Numbers are written with two decimals. Exact binary ties round half to
//! even, so 2.125 kWh is written as `2.12` and 0.375 kWh as `0.38`.

use std::io::Write;

use crate::display::format_fixed;
use crate::error::{ProsumerError, ProsumerResult};
use crate::reports::ReportData;

/// Header row, always written first
pub const CSV_HEADER: [&str; 5] = [
    "date",
    "hour",
    "production_kwh",
    "consumption_kwh",
    "balance_kwh",
];

const DECIMALS: usize = 2;

/// Write the report rows as CSV
pub fn write_csv<W: Write>(report: &ReportData, writer: W) -> ProsumerResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    wtr.write_record(CSV_HEADER)?;

    for row in &report.rows {
        wtr.write_record(&[
            row.date.format("%Y-%m-%d").to_string(),
            row.hour.to_string(),
            format_fixed(row.production_kwh, DECIMALS),
            format_fixed(row.consumption_kwh, DECIMALS),
            format_fixed(row.balance_kwh, DECIMALS),
        ])?;
    }

    wtr.flush()
        .map_err(|e| ProsumerError::Export(e.to_string()))?;
    Ok(())
}

/// Render the report as a CSV string
pub fn to_csv(report: &ReportData) -> ProsumerResult<String> {
    let mut buffer = Vec::new();
    write_csv(report, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| ProsumerError::Export(e.to_string()))
}
