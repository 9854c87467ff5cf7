//! User settings
//!
//! Persisted preferences for the CLI host. `system_losses` is stored as a
//! fraction (`0.15`), the way the dashboard's database keeps it; everything
//! handed to the engine goes through the percentage accessors.

use serde::{Deserialize, Serialize};

use super::paths::ProsumerPaths;
use crate::engine::{ProductionEstimator, DEFAULT_SYSTEM_LOSSES_PERCENTAGE};
use crate::error::{ProsumerError, ProsumerResult};
use crate::models::units::{fraction_to_percentage, percentage_to_fraction};

/// User settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Combined PV system losses as a fraction (0.15 = 15%)
    #[serde(default = "default_system_losses")]
    pub system_losses: f64,

    /// Longest date range a single report may cover, in days
    #[serde(default = "default_max_report_days")]
    pub max_report_days: u32,

    /// Date format for input files and command-line dates (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_system_losses() -> f64 {
    DEFAULT_SYSTEM_LOSSES_PERCENTAGE / 100.0
}

fn default_max_report_days() -> u32 {
    366
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            system_losses: default_system_losses(),
            max_report_days: default_max_report_days(),
            date_format: default_date_format(),
        }
    }
}

impl Settings {
    /// System losses in percent, as the engine expects them
    pub fn system_losses_percentage(&self) -> ProsumerResult<f64> {
        fraction_to_percentage(self.system_losses)
    }

    /// Store system losses given in percent
    pub fn set_system_losses_percentage(&mut self, percentage: f64) -> ProsumerResult<()> {
        // 100% losses would zero every estimate.
        ProductionEstimator::from_losses_percentage(percentage)?;
        self.system_losses = percentage_to_fraction(percentage)?;
        Ok(())
    }

    /// Set the report length cap
    pub fn set_max_report_days(&mut self, days: u32) -> ProsumerResult<()> {
        if days == 0 {
            return Err(ProsumerError::Validation(
                "max report days must be at least 1".into(),
            ));
        }
        self.max_report_days = days;
        Ok(())
    }

    /// Production estimator calibrated with the configured losses
    pub fn estimator(&self) -> ProsumerResult<ProductionEstimator> {
        ProductionEstimator::from_losses_percentage(self.system_losses_percentage()?)
    }

    /// Check all fields
    pub fn validate(&self) -> ProsumerResult<()> {
        self.estimator()?;
        if self.max_report_days == 0 {
            return Err(ProsumerError::Config(
                "max_report_days must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &ProsumerPaths) -> Result<Self, ProsumerError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                ProsumerError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                ProsumerError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings
                .validate()
                .map_err(|e| ProsumerError::Config(format!("Invalid settings file: {}", e)))?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &ProsumerPaths) -> Result<(), ProsumerError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            ProsumerError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(&settings_path, contents).map_err(|e| {
            ProsumerError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}
