//! Export module
//!
//! Serializes energy balance reports:
//! - CSV: flat hourly table (spreadsheet-compatible, diffable)
//! - JSON: full report including summary, for machine consumption

pub mod csv;
pub mod json;

pub use self::csv::{to_csv, write_csv, CSV_HEADER};
pub use self::json::{to_json, write_json};
