//! # Rule Set
//!
//! Rate tables that map categorical inputs to per-square-foot rates and
//! cost multipliers.
//!
//! ## Lookup Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  base_hardware_rate        class base  (standard 800, ribbon 1200)      │
//! │                            + 400 if pitch <= 4.0 mm                     │
//! │                            + 800 if pitch <= 2.5 mm   (independent!)    │
//! │                            + 200 if outdoor                             │
//! │                                                                         │
//! │  structural_multiplier     0.20 + 0.05 outdoor + 0.15 new structure     │
//! │                                 + 0.10 rigging + 0.05 curved            │
//! │                                                                         │
//! │  labor_multiplier          0.15 + 0.15 union + 0.02 rear access         │
//! │                                                                         │
//! │  fees                      shipping 5% of hardware, contingency 5%,     │
//! │                            bond 1%, default margin 30%                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Fine-Pitch Tiers
//! The two pitch checks are independent: a 2.0 mm display gets both the
//! 400 and the 800 premium (+1200). This matches the pricing sheet the
//! tables were taken from and is kept until the sales team confirms
//! otherwise.
//!
//! ## Immutability
//! A `RuleSet` is plain data passed by reference into every calculation.
//! There is no global table; reloading is done by swapping whole values
//! (see `lumen_rules::RuleSetHandle`).

use serde::{Deserialize, Serialize};

use crate::types::{
    Access, Environment, LaborJurisdiction, LineItemInput, MountingType, ProductClass, Shape,
    StructureStatus,
};

// =============================================================================
// Hardware Rules
// =============================================================================

/// Per-square-foot hardware rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HardwareRules {
    pub standard_rate: f64,
    pub ribbon_rate: f64,
    pub scoreboard_rate: f64,
    /// Pitch at or below which `fine_pitch_premium` applies (mm).
    pub fine_pitch_threshold_mm: f64,
    pub fine_pitch_premium: f64,
    /// Pitch at or below which `ultra_fine_pitch_premium` applies (mm).
    pub ultra_fine_pitch_threshold_mm: f64,
    pub ultra_fine_pitch_premium: f64,
    /// Weatherproofing surcharge for outdoor displays.
    pub outdoor_premium: f64,
}

impl Default for HardwareRules {
    fn default() -> Self {
        HardwareRules {
            standard_rate: 800.0,
            ribbon_rate: 1200.0,
            scoreboard_rate: 800.0,
            fine_pitch_threshold_mm: 4.0,
            fine_pitch_premium: 400.0,
            ultra_fine_pitch_threshold_mm: 2.5,
            ultra_fine_pitch_premium: 800.0,
            outdoor_premium: 200.0,
        }
    }
}

// =============================================================================
// Structural Rules
// =============================================================================

/// Structural cost as a fraction of hardware cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuralRules {
    pub base: f64,
    /// Wind load.
    pub outdoor: f64,
    pub new_structure: f64,
    pub rigging: f64,
    pub curved: f64,
}

impl Default for StructuralRules {
    fn default() -> Self {
        StructuralRules {
            base: 0.20,
            outdoor: 0.05,
            new_structure: 0.15,
            rigging: 0.10,
            curved: 0.05,
        }
    }
}

// =============================================================================
// Labor Rules
// =============================================================================

/// Labor cost as a fraction of hardware plus structural cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaborRules {
    pub base: f64,
    pub union: f64,
    /// Prevailing-wage jobs carry no surcharge unless configured.
    pub prevailing: f64,
    pub rear_access: f64,
}

impl Default for LaborRules {
    fn default() -> Self {
        LaborRules {
            base: 0.15,
            union: 0.15,
            prevailing: 0.0,
            rear_access: 0.02,
        }
    }
}

// =============================================================================
// Fee Rules
// =============================================================================

/// Fixed rates applied on top of the category costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeRules {
    /// Shipping as a fraction of raw hardware.
    pub shipping_rate: f64,
    /// Contingency as a fraction of the marked-up subtotal.
    pub contingency_rate: f64,
    /// Bond as a fraction of the pre-bond sell subtotal.
    pub bond_rate: f64,
    /// Margin used when a line item does not name one.
    pub default_margin_percent: f64,
}

impl Default for FeeRules {
    fn default() -> Self {
        FeeRules {
            shipping_rate: 0.05,
            contingency_rate: 0.05,
            bond_rate: 0.01,
            default_margin_percent: 30.0,
        }
    }
}

// =============================================================================
// Power Rules
// =============================================================================

/// Electrical load assumptions.
///
/// The 120 V reference is a simplifying assumption for sizing circuits in a
/// proposal, not an electrical design calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerRules {
    pub indoor_watts_per_sqft: f64,
    pub outdoor_watts_per_sqft: f64,
    pub reference_voltage: f64,
}

impl Default for PowerRules {
    fn default() -> Self {
        PowerRules {
            indoor_watts_per_sqft: 35.0,
            outdoor_watts_per_sqft: 65.0,
            reference_voltage: 120.0,
        }
    }
}

// =============================================================================
// Rule Set
// =============================================================================

/// The complete rate table.
///
/// ## Example Config File
/// ```toml
/// [hardware]
/// standard_rate = 800.0
/// ribbon_rate = 1200.0
///
/// [fees]
/// default_margin_percent = 30.0
///
/// [power]
/// reference_voltage = 120.0
/// ```
///
/// Every section and field is optional; omitted values keep their defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    pub hardware: HardwareRules,
    pub structural: StructuralRules,
    pub labor: LaborRules,
    pub fees: FeeRules,
    pub power: PowerRules,
}

impl RuleSet {
    /// Base rate for a product class, before any surcharge.
    pub fn class_base_rate(&self, class: ProductClass) -> f64 {
        match class {
            ProductClass::Standard => self.hardware.standard_rate,
            ProductClass::Ribbon => self.hardware.ribbon_rate,
            ProductClass::Scoreboard => self.hardware.scoreboard_rate,
        }
    }

    /// Hardware rate per square foot.
    ///
    /// Surcharges are additive and checked independently in a fixed order:
    /// fine pitch, ultra-fine pitch, outdoor. A missing, zero, negative or
    /// non-finite pitch gets no pitch premium.
    pub fn base_hardware_rate(&self, input: &LineItemInput) -> f64 {
        let hw = &self.hardware;
        let mut rate = self.class_base_rate(input.product_class);

        if let Some(pitch) = input.pixel_pitch_mm.filter(|p| p.is_finite() && *p > 0.0) {
            if pitch <= hw.fine_pitch_threshold_mm {
                rate += hw.fine_pitch_premium;
            }
            if pitch <= hw.ultra_fine_pitch_threshold_mm {
                rate += hw.ultra_fine_pitch_premium;
            }
        }

        if input.environment.is_outdoor() {
            rate += hw.outdoor_premium;
        }

        rate
    }

    /// Structural cost as a fraction of raw hardware. Pure sum of flags.
    pub fn structural_multiplier(&self, input: &LineItemInput) -> f64 {
        let rules = &self.structural;
        let mut multiplier = rules.base;

        if input.environment == Environment::Outdoor {
            multiplier += rules.outdoor;
        }
        if input.structure_status == StructureStatus::New {
            multiplier += rules.new_structure;
        }
        if input.mounting_type == MountingType::Rigging {
            multiplier += rules.rigging;
        }
        if input.shape == Shape::Curved {
            multiplier += rules.curved;
        }

        multiplier
    }

    /// Labor cost as a fraction of raw hardware plus raw structural.
    pub fn labor_multiplier(&self, input: &LineItemInput) -> f64 {
        let rules = &self.labor;
        let mut multiplier = rules.base;

        multiplier += match input.labor_jurisdiction {
            LaborJurisdiction::Standard => 0.0,
            LaborJurisdiction::Union => rules.union,
            LaborJurisdiction::Prevailing => rules.prevailing,
        };
        if input.access == Access::Rear {
            multiplier += rules.rear_access;
        }

        multiplier
    }

    /// Contingency applies only to new structures built outdoors.
    pub fn contingency_applies(&self, input: &LineItemInput) -> bool {
        input.structure_status.is_new() && input.environment.is_outdoor()
    }

    /// Display power draw per square foot.
    pub fn watts_per_sqft(&self, environment: Environment) -> f64 {
        match environment {
            Environment::Indoor => self.power.indoor_watts_per_sqft,
            Environment::Outdoor => self.power.outdoor_watts_per_sqft,
        }
    }

    /// Margin for an item: its own target, or the table default.
    pub fn margin_for(&self, input: &LineItemInput) -> f64 {
        input
            .target_margin_percent
            .unwrap_or(self.fees.default_margin_percent)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_class_base_rates() {
        let rules = RuleSet::default();
        assert_eq!(rules.base_hardware_rate(&LineItemInput::new(1.0, 1.0)), 800.0);
        let ribbon = LineItemInput::new(1.0, 1.0).with_product_class(ProductClass::Ribbon);
        assert_eq!(rules.base_hardware_rate(&ribbon), 1200.0);
    }

    #[test]
    fn test_fine_pitch_tiers_are_independent() {
        let rules = RuleSet::default();
        let rate = |pitch: f64| {
            rules.base_hardware_rate(&LineItemInput::new(1.0, 1.0).with_pixel_pitch(pitch))
        };

        assert_eq!(rate(6.0), 800.0);
        assert_eq!(rate(4.0), 1200.0);
        assert_eq!(rate(3.0), 1200.0);
        // Both tiers apply at or below 2.5 mm.
        assert_eq!(rate(2.5), 2000.0);
        assert_eq!(rate(1.5), 2000.0);
    }

    #[test]
    fn test_invalid_pitch_gets_no_premium() {
        let rules = RuleSet::default();
        for pitch in [0.0, -2.0, f64::NAN, f64::NEG_INFINITY] {
            let input = LineItemInput::new(1.0, 1.0).with_pixel_pitch(pitch);
            assert_eq!(rules.base_hardware_rate(&input), 800.0);
        }
    }

    #[test]
    fn test_outdoor_premium_stacks_with_pitch() {
        let rules = RuleSet::default();
        let input = LineItemInput::new(1.0, 1.0)
            .with_product_class(ProductClass::Ribbon)
            .with_pixel_pitch(3.9)
            .with_environment(Environment::Outdoor);
        assert_eq!(rules.base_hardware_rate(&input), 1200.0 + 400.0 + 200.0);
    }

    #[test]
    fn test_structural_multiplier_sums_flags() {
        let rules = RuleSet::default();
        assert!(approx(rules.structural_multiplier(&LineItemInput::new(1.0, 1.0)), 0.20));

        let everything = LineItemInput::new(1.0, 1.0)
            .with_environment(Environment::Outdoor)
            .with_structure_status(StructureStatus::New)
            .with_mounting_type(MountingType::Rigging)
            .with_shape(Shape::Curved);
        assert!(approx(rules.structural_multiplier(&everything), 0.55));
    }

    #[test]
    fn test_labor_multiplier() {
        let rules = RuleSet::default();
        let base = LineItemInput::new(1.0, 1.0);
        assert!(approx(rules.labor_multiplier(&base), 0.15));

        let union_rear = base
            .clone()
            .with_labor_jurisdiction(LaborJurisdiction::Union)
            .with_access(Access::Rear);
        assert!(approx(rules.labor_multiplier(&union_rear), 0.32));

        let prevailing = base.with_labor_jurisdiction(LaborJurisdiction::Prevailing);
        assert!(approx(rules.labor_multiplier(&prevailing), 0.15));
    }

    #[test]
    fn test_margin_for_uses_default() {
        let rules = RuleSet::default();
        assert_eq!(rules.margin_for(&LineItemInput::new(1.0, 1.0)), 30.0);
        assert_eq!(
            rules.margin_for(&LineItemInput::new(1.0, 1.0).with_margin(25.0)),
            25.0
        );
    }

    #[test]
    fn test_partial_table_keeps_defaults() {
        let rules: RuleSet = serde_json::from_str(r#"{ "hardware": { "ribbon_rate": 1500.0 } }"#)
            .unwrap();
        assert_eq!(rules.hardware.ribbon_rate, 1500.0);
        assert_eq!(rules.hardware.standard_rate, 800.0);
        assert_eq!(rules.fees, FeeRules::default());
    }
}
