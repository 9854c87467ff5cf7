//! Energy balance engine
//!
//! Pure, synchronous computation over caller-supplied records: the weekly
//! consumption grid, hourly production estimates, and per-hour balances.
//! Nothing here performs I/O or holds state between calls, so reports for
//! different requests can be computed concurrently as long as the caller
//! does not mutate its input collections mid-call.
//!
//! All percentage-like values are in `0..=100` units. Callers that persist
//! fractions convert at their own boundary (see [`crate::models::units`]).

pub mod balance;
pub mod grid;
pub mod production;

pub use balance::balance;
pub use grid::{completion_stats, decode_key, encode_key, CompletionStats, ConsumptionGrid};
pub use production::{estimate, ProductionEstimator};

use crate::error::{ProsumerError, ProsumerResult};

/// Combined system efficiency applied to every production estimate
pub const SYSTEM_EFFICIENCY: f64 = 0.85;

/// System losses matching [`SYSTEM_EFFICIENCY`], as a percentage
pub const DEFAULT_SYSTEM_LOSSES_PERCENTAGE: f64 = 15.0;

/// Upper bound for nameplate PV capacity of a prosumer installation (kWp)
pub const MAX_PV_POWER_KWP: f64 = 100.0;

/// Upper bound for a single hourly consumption value (kWh)
pub const MAX_HOURLY_CONSUMPTION_KWH: f64 = 100.0;

/// Days in the weekly consumption grid (Sunday = 0 .. Saturday = 6)
pub const DAYS_PER_WEEK: u8 = 7;

/// Hours per day (0 .. 23)
pub const HOURS_PER_DAY: u8 = 24;

/// Number of slots in a complete weekly profile
pub const SLOTS_PER_WEEK: usize = DAYS_PER_WEEK as usize * HOURS_PER_DAY as usize;

/// Validate a day-of-week index
pub fn validate_day(day: u8) -> ProsumerResult<()> {
    if day >= DAYS_PER_WEEK {
        return Err(ProsumerError::Validation(format!(
            "day of week must be between 0 and {}, got {}",
            DAYS_PER_WEEK - 1,
            day
        )));
    }
    Ok(())
}

/// Validate an hour-of-day index
pub fn validate_hour(hour: u8) -> ProsumerResult<()> {
    if hour >= HOURS_PER_DAY {
        return Err(ProsumerError::Validation(format!(
            "hour must be between 0 and {}, got {}",
            HOURS_PER_DAY - 1,
            hour
        )));
    }
    Ok(())
}

/// Validate nameplate PV capacity: `0 < kwp <= MAX_PV_POWER_KWP`
pub fn validate_pv_power(kwp: f64) -> ProsumerResult<()> {
    if !kwp.is_finite() || kwp <= 0.0 || kwp > MAX_PV_POWER_KWP {
        return Err(ProsumerError::Validation(format!(
            "PV power must be greater than 0 and at most {} kWp, got {}",
            MAX_PV_POWER_KWP, kwp
        )));
    }
    Ok(())
}

/// Validate an insolation percentage in `[0, 100]`
pub fn validate_insolation_percentage(percentage: f64) -> ProsumerResult<()> {
    if !percentage.is_finite() || !(0.0..=100.0).contains(&percentage) {
        return Err(ProsumerError::Validation(format!(
            "insolation percentage must be between 0 and 100, got {}",
            percentage
        )));
    }
    Ok(())
}

/// Validate an hourly consumption value in `[0, MAX_HOURLY_CONSUMPTION_KWH]`
pub fn validate_consumption_kwh(kwh: f64) -> ProsumerResult<()> {
    if !kwh.is_finite() || !(0.0..=MAX_HOURLY_CONSUMPTION_KWH).contains(&kwh) {
        return Err(ProsumerError::Validation(format!(
            "consumption must be between 0 and {} kWh, got {}",
            MAX_HOURLY_CONSUMPTION_KWH, kwh
        )));
    }
    Ok(())
}
