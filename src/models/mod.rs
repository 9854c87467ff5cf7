//! Core data models
//!
//! Records the engine consumes: locations, weekly consumption slots, and
//! hourly insolation samples, plus the unit conversions used at the
//! persistence boundary.

pub mod ids;
pub mod insolation;
pub mod location;
pub mod slot;
pub mod units;

pub use ids::LocationId;
pub use insolation::InsolationSample;
pub use location::{primary_location, select_location, set_primary, validate_primary, Location};
pub use slot::{ConsumptionSlot, SlotKey};
pub use units::{fraction_to_percentage, percentage_to_fraction};
