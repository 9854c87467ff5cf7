//! Configuration module
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence
//! - Fraction/percentage conversion for stored calibration values

pub mod paths;
pub mod settings;

pub use paths::ProsumerPaths;
pub use settings::Settings;
