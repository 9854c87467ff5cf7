//! Unit conversions at the persistence boundary
//!
//! Storage keeps loss-style values as fractions (`0.15`), while everything
//! the engine accepts or returns is a percentage (`15.0`). Convert exactly
//! once on the way in and once on the way out.

use crate::error::{ProsumerError, ProsumerResult};

/// Convert a stored fraction (`0..=1`) to a percentage (`0..=100`)
pub fn fraction_to_percentage(fraction: f64) -> ProsumerResult<f64> {
    if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
        return Err(ProsumerError::Validation(format!(
            "fraction must be between 0 and 1, got {}",
            fraction
        )));
    }
    Ok(fraction * 100.0)
}

/// Convert a percentage (`0..=100`) to a fraction (`0..=1`) for storage
pub fn percentage_to_fraction(percentage: f64) -> ProsumerResult<f64> {
    if !percentage.is_finite() || !(0.0..=100.0).contains(&percentage) {
        return Err(ProsumerError::Validation(format!(
            "percentage must be between 0 and 100, got {}",
            percentage
        )));
    }
    Ok(percentage / 100.0)
}
