//! Per-hour energy balance
//!
//! Sign convention: positive exports to the grid, negative imports from it,
//! zero is exact self-consumption.

/// `production - consumption` for one hour
pub fn balance(production_kwh: f64, consumption_kwh: f64) -> f64 {
    production_kwh - consumption_kwh
}
