//! Display formatting for terminal output
//!
//! Provides utilities for rendering reports and consumption profiles in
//! the terminal.

pub mod profile;
pub mod report;

pub use profile::{day_name, format_completion, format_profile_grid};
pub use report::{format_bar, format_fixed, format_kwh, format_percentage, separator};
