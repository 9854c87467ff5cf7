//! Prosumer Balance - energy balance and consumption-profile engine
//!
//! This library models a prosumer's typical week of electricity use, estimates
//! hourly PV production from nameplate power and insolation, and aggregates a
//! date range into an hourly energy balance report with export/import totals.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `engine`: Pure computation (consumption grid, production, balance)
//! - `reports`: Date-range aggregation into `ReportData`
//! - `export`: CSV and JSON serialization of reports
//! - `models`: Locations, consumption slots, insolation samples
//! - `import`: Loading records from JSON/CSV files
//! - `config`: Configuration and path management
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `prosumer` binary
//! - `error`: Custom error types
//!
//! # Example
//!
//! ```rust,ignore
//! use prosumer::models::Location;
//! use prosumer::reports::build_report;
//! use prosumer::export::to_csv;
//!
//! let location = Location::new("House", "Brno", 5.0);
//! let report = build_report(&location, &slots, &samples, start, end)?;
//! let csv = to_csv(&report)?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod export;
pub mod import;
pub mod models;
pub mod reports;

pub use error::{ProsumerError, ProsumerResult};
