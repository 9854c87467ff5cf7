//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the engine.

pub mod estimate;
pub mod profile;
pub mod report;

pub use estimate::{handle_estimate_command, EstimateArgs};
pub use profile::{handle_profile_command, ProfileCommands};
pub use report::{handle_report_command, ReportArgs, ReportFormat};
