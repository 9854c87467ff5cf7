//! JSON Export functionality
//!
//! Machine-readable dump of a full report, rows and summary included.

use std::io::Write;

use crate::error::{ProsumerError, ProsumerResult};
use crate::reports::ReportData;

/// Write the report as pretty-printed JSON
pub fn write_json<W: Write>(report: &ReportData, writer: &mut W) -> ProsumerResult<()> {
    serde_json::to_writer_pretty(&mut *writer, report)
        .map_err(|e| ProsumerError::Export(format!("Failed to serialize report: {}", e)))?;
    writeln!(writer).map_err(|e| ProsumerError::Export(e.to_string()))?;
    Ok(())
}

/// Render the report as a JSON string
pub fn to_json(report: &ReportData) -> ProsumerResult<String> {
    serde_json::to_string_pretty(report)
        .map_err(|e| ProsumerError::Export(format!("Failed to serialize report: {}", e)))
}
