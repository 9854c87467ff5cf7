//! Weekly consumption slots
//!
//! A profile is up to 168 slots, one per `(day_of_week, hour)` pair.
//! Day numbering is Sunday = 0 through Saturday = 6.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::LocationId;
use crate::engine::{
    validate_consumption_kwh, validate_day, validate_hour, DAYS_PER_WEEK, HOURS_PER_DAY,
};
use crate::error::ProsumerResult;

const KEY_SEPARATOR: char = '_';

/// Validated `(day_of_week, hour)` coordinate in the weekly grid
///
/// Fields are private so that every value in circulation is in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    day: u8,
    hour: u8,
}

impl SlotKey {
    /// Build a key, rejecting out-of-range coordinates
    pub fn new(day: u8, hour: u8) -> ProsumerResult<Self> {
        validate_day(day)?;
        validate_hour(hour)?;
        Ok(Self { day, hour })
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// Encode as `"{day}_{hour}"`
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Decode a `"{day}_{hour}"` string
    ///
    /// Returns `None` for anything malformed or out of range. Keys may come
    /// from half-edited UI state, so probing must never fail loudly.
    pub fn decode(key: &str) -> Option<Self> {
        let (day, hour) = key.split_once(KEY_SEPARATOR)?;
        let slot = Self::new(day.parse().ok()?, hour.parse().ok()?).ok()?;
        // Only the canonical form decodes, so "01_02" and "+1_2" stay distinct from "1_2"
        (slot.encode() == key).then_some(slot)
    }

    /// All 168 keys, ordered by day then hour
    pub fn all() -> impl Iterator<Item = SlotKey> {
        (0..DAYS_PER_WEEK).flat_map(|day| (0..HOURS_PER_DAY).map(move |hour| SlotKey { day, hour }))
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.day, KEY_SEPARATOR, self.hour)
    }
}

/// One hour of a location's typical week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionSlot {
    /// Owning location
    pub location_id: LocationId,
    /// Day of week, Sunday = 0
    pub day_of_week: u8,
    /// Hour of day, 0..=23
    pub hour: u8,
    /// Expected consumption for this hour in kWh
    pub consumption_kwh: f64,
}

impl ConsumptionSlot {
    /// Create a validated slot
    pub fn new(
        location_id: LocationId,
        day_of_week: u8,
        hour: u8,
        consumption_kwh: f64,
    ) -> ProsumerResult<Self> {
        let slot = Self {
            location_id,
            day_of_week,
            hour,
            consumption_kwh,
        };
        slot.validate()?;
        Ok(slot)
    }

    /// Grid coordinate of this slot
    pub fn key(&self) -> ProsumerResult<SlotKey> {
        SlotKey::new(self.day_of_week, self.hour)
    }

    /// Validate coordinates and value
    pub fn validate(&self) -> ProsumerResult<()> {
        validate_day(self.day_of_week)?;
        validate_hour(self.hour)?;
        validate_consumption_kwh(self.consumption_kwh)
    }
}
