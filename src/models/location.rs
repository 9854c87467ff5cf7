//! Location model
//!
//! A site registered by a user: where the panels are, how big the array is,
//! and which city's insolation series applies to it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::LocationId;
use crate::engine::validate_pv_power;
use crate::error::{ProsumerError, ProsumerResult};

/// A registered PV location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    /// Unique identifier
    #[serde(default)]
    pub id: LocationId,

    /// Display name (e.g., "Family house")
    pub name: String,

    /// City used as the insolation lookup key
    #[serde(default)]
    pub city: Option<String>,

    /// Nameplate PV capacity in kWp
    pub pv_power_kwp: f64,

    /// Whether this is the user's primary location
    #[serde(default)]
    pub is_primary: bool,

    /// When the location was created
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    /// When the location was last modified
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Location {
    /// Create a new location
    pub fn new(name: impl Into<String>, city: impl Into<String>, pv_power_kwp: f64) -> Self {
        let now = Utc::now();
        Self {
            id: LocationId::new(),
            name: name.into(),
            city: Some(city.into()),
            pv_power_kwp,
            is_primary: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rename the location
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.updated_at = Utc::now();
    }

    /// Change the city used for insolation lookups
    pub fn set_city(&mut self, city: Option<String>) {
        self.city = city;
        self.updated_at = Utc::now();
    }

    /// Change the nameplate capacity
    pub fn set_pv_power(&mut self, pv_power_kwp: f64) -> ProsumerResult<()> {
        validate_pv_power(pv_power_kwp)?;
        self.pv_power_kwp = pv_power_kwp;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Normalized city key for insolation matching, if a city is set
    ///
    /// Matching is trimmed and case-insensitive; a blank city counts as none.
    pub fn city_key(&self) -> Option<String> {
        self.city
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_lowercase)
    }

    /// Validate the location
    pub fn validate(&self) -> ProsumerResult<()> {
        if self.name.trim().is_empty() {
            return Err(ProsumerError::Validation(
                "Location name cannot be empty".into(),
            ));
        }

        if self.name.len() > 100 {
            return Err(ProsumerError::Validation(format!(
                "Location name too long ({} chars, max 100)",
                self.name.len()
            )));
        }

        validate_pv_power(self.pv_power_kwp)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.city.as_deref() {
            Some(city) if !city.trim().is_empty() => {
                write!(f, "{} ({}, {} kWp)", self.name, city.trim(), self.pv_power_kwp)
            }
            _ => write!(f, "{} ({} kWp)", self.name, self.pv_power_kwp),
        }
    }
}

/// Return the primary location, if one is flagged
pub fn primary_location(locations: &[Location]) -> Option<&Location> {
    locations.iter().find(|l| l.is_primary)
}

/// Flag `id` as primary and clear the flag on every other location
pub fn set_primary(locations: &mut [Location], id: LocationId) -> ProsumerResult<()> {
    if !locations.iter().any(|l| l.id == id) {
        return Err(ProsumerError::location_not_found(id.to_string()));
    }

    let now = Utc::now();
    for location in locations.iter_mut() {
        let should_be_primary = location.id == id;
        if location.is_primary != should_be_primary {
            location.is_primary = should_be_primary;
            location.updated_at = now;
        }
    }
    Ok(())
}

/// Check that at most one location is flagged primary
pub fn validate_primary(locations: &[Location]) -> ProsumerResult<()> {
    let primaries: Vec<&str> = locations
        .iter()
        .filter(|l| l.is_primary)
        .map(|l| l.name.as_str())
        .collect();

    if primaries.len() > 1 {
        return Err(ProsumerError::Validation(format!(
            "at most one primary location is allowed, found {}: {}",
            primaries.len(),
            primaries.join(", ")
        )));
    }
    Ok(())
}

/// Pick a location by name or ID, falling back to the primary one and then
/// to the only one
pub fn select_location<'a>(
    locations: &'a [Location],
    identifier: Option<&str>,
) -> ProsumerResult<&'a Location> {
    if let Some(ident) = identifier {
        return locations
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(ident) || l.id.to_string() == ident)
            .or_else(|| {
                LocationId::parse(ident)
                    .ok()
                    .and_then(|id| locations.iter().find(|l| l.id == id))
            })
            .ok_or_else(|| ProsumerError::location_not_found(ident));
    }

    if let Some(primary) = primary_location(locations) {
        return Ok(primary);
    }

    match locations {
        [only] => Ok(only),
        [] => Err(ProsumerError::location_not_found("(none defined)")),
        _ => Err(ProsumerError::Validation(
            "several locations defined and none is primary; pick one by name".into(),
        )),
    }
}
