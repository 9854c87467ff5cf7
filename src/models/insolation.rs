//! Insolation samples
//!
//! Externally supplied, read-only hourly insolation for a city, expressed as
//! a percentage of clear-sky peak.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::engine::{validate_hour, validate_insolation_percentage};
use crate::error::{ProsumerError, ProsumerResult};

/// One hour of measured or forecast insolation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsolationSample {
    /// City the measurement belongs to
    pub city: String,
    /// Calendar day
    pub date: NaiveDate,
    /// Hour of day, 0..=23
    pub hour: u8,
    /// Insolation in percent, 0..=100
    pub insolation_percentage: f64,
}

impl InsolationSample {
    /// Create a validated sample
    pub fn new(
        city: impl Into<String>,
        date: NaiveDate,
        hour: u8,
        insolation_percentage: f64,
    ) -> ProsumerResult<Self> {
        let sample = Self {
            city: city.into(),
            date,
            hour,
            insolation_percentage,
        };
        sample.validate()?;
        Ok(sample)
    }

    /// Normalized city key, matching [`crate::models::Location::city_key`]
    pub fn city_key(&self) -> String {
        self.city.trim().to_lowercase()
    }

    /// Validate hour, percentage, and city
    pub fn validate(&self) -> ProsumerResult<()> {
        if self.city.trim().is_empty() {
            return Err(ProsumerError::Validation(
                "insolation sample has no city".into(),
            ));
        }
        validate_hour(self.hour)?;
        validate_insolation_percentage(self.insolation_percentage)
    }
}
