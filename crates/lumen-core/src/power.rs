//! # Power Model
//!
//! Rough electrical load for a display, used to size circuits in a proposal.
//!
//! ```text
//! watts = area_sqft × (outdoor ? 65 : 35)
//! amps  = round(watts / 120)
//! ```
//!
//! The fixed 120 V reference is a simplifying assumption. It is not an
//! electrical design calculation and ignores three-phase service, power
//! factor and inrush current.

use serde::{Deserialize, Serialize};

use crate::figures::QuoteFigures;
use crate::rules::RuleSet;
use crate::types::Environment;

/// Estimated draw of one display.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerEstimate {
    pub total_watts: f64,
    pub amps: i64,
}

impl PowerEstimate {
    /// Estimates load from screen area and environment.
    ///
    /// ## Example
    /// ```rust
    /// use lumen_core::power::PowerEstimate;
    /// use lumen_core::{Environment, RuleSet};
    ///
    /// let power = PowerEstimate::estimate(50.0, Environment::Indoor, &RuleSet::default());
    /// assert_eq!(power.total_watts, 1750.0);
    /// assert_eq!(power.amps, 15);
    /// ```
    pub fn estimate(area_sqft: f64, environment: Environment, rules: &RuleSet) -> Self {
        let total_watts = area_sqft * rules.watts_per_sqft(environment);
        let voltage = rules.power.reference_voltage;

        // Unvalidated tables may carry voltage <= 0; amps stay 0 then.
        let amps = if voltage > 0.0 && total_watts.is_finite() {
            (total_watts / voltage).round() as i64
        } else {
            0
        };

        PowerEstimate { total_watts, amps }
    }

    /// Copies the estimate onto a line item's figures.
    pub fn attach(&self, figures: &mut QuoteFigures) {
        figures.total_watts = self.total_watts;
        figures.power_amps = self.amps;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indoor_and_outdoor_draw() {
        let rules = RuleSet::default();

        let indoor = PowerEstimate::estimate(50.0, Environment::Indoor, &rules);
        assert_eq!(indoor.total_watts, 1750.0);
        assert_eq!(indoor.amps, 15); // 14.58

        let outdoor = PowerEstimate::estimate(50.0, Environment::Outdoor, &rules);
        assert_eq!(outdoor.total_watts, 3250.0);
        assert_eq!(outdoor.amps, 27); // 27.08
    }

    #[test]
    fn test_zero_area_draws_nothing() {
        let power = PowerEstimate::estimate(0.0, Environment::Outdoor, &RuleSet::default());
        assert_eq!(power, PowerEstimate::default());
    }

    #[test]
    fn test_bad_voltage_yields_zero_amps() {
        let mut rules = RuleSet::default();
        rules.power.reference_voltage = 0.0;
        let power = PowerEstimate::estimate(50.0, Environment::Indoor, &rules);
        assert_eq!(power.amps, 0);
        assert_eq!(power.total_watts, 1750.0);
    }

    #[test]
    fn test_attach_sets_power_fields() {
        let mut figures = QuoteFigures::default();
        PowerEstimate::estimate(10.0, Environment::Outdoor, &RuleSet::default())
            .attach(&mut figures);
        assert_eq!(figures.total_watts, 650.0);
        assert_eq!(figures.power_amps, 5);
    }
}
