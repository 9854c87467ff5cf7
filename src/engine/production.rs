//! Hourly PV production estimate
//!
//! `production = pv_kwp * (insolation% / 100) * efficiency`
//!
//! This is a deliberate simplification: a single efficiency factor stands in
//! for inverter, wiring, soiling, and temperature losses, and insolation is
//! taken as a fraction of nameplate output. There is no irradiance,
//! orientation, or cell-temperature model.

use super::{validate_insolation_percentage, validate_pv_power, SYSTEM_EFFICIENCY};
use crate::error::{ProsumerError, ProsumerResult};

/// Estimate production with the default system efficiency
pub fn estimate(pv_power_kwp: f64, insolation_percentage: f64) -> f64 {
    ProductionEstimator::default().estimate(pv_power_kwp, insolation_percentage)
}

/// Converts nameplate capacity and insolation into hourly kWh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductionEstimator {
    efficiency: f64,
}

impl Default for ProductionEstimator {
    fn default() -> Self {
        Self {
            efficiency: SYSTEM_EFFICIENCY,
        }
    }
}

impl ProductionEstimator {
    /// Build an estimator from combined system losses in percent
    pub fn from_losses_percentage(losses_percentage: f64) -> ProsumerResult<Self> {
        if !losses_percentage.is_finite() || !(0.0..100.0).contains(&losses_percentage) {
            return Err(ProsumerError::Validation(format!(
                "system losses must be at least 0% and below 100%, got {}",
                losses_percentage
            )));
        }
        Ok(Self {
            efficiency: 1.0 - losses_percentage / 100.0,
        })
    }

    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }

    /// Estimate production for one hour, assuming validated input
    ///
    /// Output is clamped to `[0, pv_power_kwp]`; non-finite results become 0.
    pub fn estimate(&self, pv_power_kwp: f64, insolation_percentage: f64) -> f64 {
        let capacity = if pv_power_kwp.is_finite() {
            pv_power_kwp.max(0.0)
        } else {
            0.0
        };
        let production = capacity * (insolation_percentage / 100.0) * self.efficiency;
        if production.is_finite() {
            production.clamp(0.0, capacity)
        } else {
            0.0
        }
    }

    /// Validate raw input, then estimate
    pub fn estimate_checked(
        &self,
        pv_power_kwp: f64,
        insolation_percentage: f64,
    ) -> ProsumerResult<f64> {
        validate_pv_power(pv_power_kwp)?;
        validate_insolation_percentage(insolation_percentage)?;
        Ok(self.estimate(pv_power_kwp, insolation_percentage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_half_sun() {
        assert!((estimate(5.0, 50.0) - 2.125).abs() < 1e-12);
    }

    #[test]
    fn test_estimate_no_sun() {
        assert_eq!(estimate(5.0, 0.0), 0.0);
    }

    #[test]
    fn test_estimate_never_negative() {
        for pv in [0.0, 0.5, 5.0, 100.0] {
            for insolation in [0.0, 1.0, 33.3, 100.0] {
                assert!(estimate(pv, insolation) >= 0.0);
            }
        }
        assert_eq!(estimate(5.0, -20.0), 0.0);
        assert_eq!(estimate(-5.0, 50.0), 0.0);
    }

    #[test]
    fn test_estimate_clamped_to_capacity() {
        let estimator = ProductionEstimator::from_losses_percentage(0.0).unwrap();
        assert_eq!(estimator.estimate(5.0, 400.0), 5.0);
        assert_eq!(estimator.estimate(5.0, f64::NAN), 0.0);
    }

    #[test]
    fn test_from_losses_percentage() {
        let estimator = ProductionEstimator::from_losses_percentage(15.0).unwrap();
        assert!((estimator.efficiency() - SYSTEM_EFFICIENCY).abs() < 1e-12);
        assert!(ProductionEstimator::from_losses_percentage(100.0).is_err());
        assert!(ProductionEstimator::from_losses_percentage(-1.0).is_err());
    }

    #[test]
    fn test_estimate_checked() {
        let estimator = ProductionEstimator::default();
        assert!(estimator.estimate_checked(0.0, 50.0).unwrap_err().is_validation());
        assert!(estimator.estimate_checked(101.0, 50.0).is_err());
        assert!(estimator.estimate_checked(5.0, 101.0).is_err());
        assert!((estimator.estimate_checked(10.0, 100.0).unwrap() - 8.5).abs() < 1e-12);
    }
}
