//! # Line Item Calculator
//!
//! Turns one [`LineItemInput`] into unrounded costs and sell prices per
//! category.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. area        = width × height                                        │
//! │  2. hardware    = area × base_hardware_rate                             │
//! │  3. structural  = hardware × structural_multiplier                      │
//! │  4. labor       = (hardware + structural) × labor_multiplier            │
//! │  5. expense     = hardware × shipping_rate                              │
//! │  6. markup      = 1 / (1 − margin)          (margin ≥ 100% rejected)    │
//! │  7. sell[c]     = raw[c] × markup           (each category on its own)  │
//! │  8. contingency = Σ sell × 5%               (new structure + outdoor)   │
//! │  9. bond        = (Σ sell + contingency) × 1%   (bond required)         │
//! │ 10. sellPrice   = Σ sell + contingency + bond                           │
//! │     internal    = hardware + structural + labor + expense               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every stage builds on the previous stage's RAW cost, never on a sell price.
//! Contingency and bond have no internal cost: they sit outside the margin
//! basis.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::QuoteResult;
use crate::figures::{CategoryFigures, QuoteFigures};
use crate::power::PowerEstimate;
use crate::rules::RuleSet;
use crate::types::{CostCategory, LineItemInput, QuoteWarning};
use crate::validation::{markup_multiplier, validate_dimension, validate_pixel_pitch};

/// Unrounded result for one line item.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItemCosting {
    pub label: Option<String>,
    pub figures: QuoteFigures,
    /// Margin used for the markup (the item's target or the default).
    pub margin_percent: f64,
    pub warnings: Vec<QuoteWarning>,
}

impl LineItemCosting {
    /// Attaches an electrical estimate to the figures.
    pub fn with_power(mut self, power: PowerEstimate) -> Self {
        power.attach(&mut self.figures);
        self
    }
}

/// Computes line items against one borrowed rule set.
#[derive(Debug, Clone, Copy)]
pub struct LineItemCalculator<'r> {
    rules: &'r RuleSet,
}

impl<'r> LineItemCalculator<'r> {
    pub fn new(rules: &'r RuleSet) -> Self {
        LineItemCalculator { rules }
    }

    /// Runs the costing pipeline for one item.
    ///
    /// ## Errors
    /// - [`crate::QuoteError::InvalidMargin`] for margins outside `[0, 100)`
    /// - [`crate::QuoteError::NonFinite`] if a figure overflows to infinity
    /// - [`crate::QuoteError::Overflow`] if a figure exceeds [`crate::figures::MAX_AMOUNT`]
    ///
    /// Invalid dimensions and pixel pitches do not fail; they are normalized
    /// and reported in `warnings`.
    pub fn compute(&self, input: &LineItemInput) -> QuoteResult<LineItemCosting> {
        let rules = self.rules;
        let margin_percent = rules.margin_for(input);
        let markup = markup_multiplier(margin_percent)?;

        let mut warnings = Vec::new();
        let width = checked_dimension("width", input.width_ft, &mut warnings);
        let height = checked_dimension("height", input.height_ft, &mut warnings);

        if let (Err(err), Some(pitch)) = (
            validate_pixel_pitch(input.pixel_pitch_mm),
            input.pixel_pitch_mm,
        ) {
            warn!(pitch, error = %err, "Ignoring pixel pitch");
            warnings.push(QuoteWarning::IgnoredPixelPitch {
                value: pitch.to_string(),
            });
        }

        let area = width * height;
        let raw_hardware = area * rules.base_hardware_rate(input);
        let raw_structural = raw_hardware * rules.structural_multiplier(input);
        let raw_labor = (raw_hardware + raw_structural) * rules.labor_multiplier(input);
        let raw_expense = raw_hardware * rules.fees.shipping_rate;

        let mut breakdown = BTreeMap::new();
        for (category, raw) in [
            (CostCategory::Hardware, raw_hardware),
            (CostCategory::Structural, raw_structural),
            (CostCategory::Labor, raw_labor),
            (CostCategory::Expense, raw_expense),
        ] {
            breakdown.insert(category, CategoryFigures::marked_up(raw, markup));
        }

        let marked_up_sell: f64 = breakdown.values().map(|figures| figures.sell).sum();

        let contingency = if rules.contingency_applies(input) {
            let contingency = marked_up_sell * rules.fees.contingency_rate;
            breakdown.insert(CostCategory::Contingency, CategoryFigures::sell_only(contingency));
            contingency
        } else {
            0.0
        };

        let bond = if input.bond_required {
            let bond = (marked_up_sell + contingency) * rules.fees.bond_rate;
            breakdown.insert(CostCategory::Bond, CategoryFigures::sell_only(bond));
            bond
        } else {
            0.0
        };

        let figures = QuoteFigures {
            screen_area: area,
            breakdown,
            total_internal_cost: raw_hardware + raw_structural + raw_labor + raw_expense,
            sell_price: marked_up_sell + contingency + bond,
            total_watts: 0.0,
            power_amps: 0,
        };
        figures.ensure_representable()?;

        debug!(
            label = input.label.as_deref().unwrap_or("-"),
            area,
            margin_percent,
            internal = figures.total_internal_cost,
            sell = figures.sell_price,
            "Line item costed"
        );

        Ok(LineItemCosting {
            label: input.label.clone(),
            figures,
            margin_percent,
            warnings,
        })
    }
}

/// Validates a dimension, pricing invalid values as zero with a warning.
fn checked_dimension(field: &str, value: f64, warnings: &mut Vec<QuoteWarning>) -> f64 {
    match validate_dimension(field, value) {
        Ok(valid) => valid,
        Err(err) => {
            warn!(field, value, error = %err, "Normalizing invalid dimension to 0");
            warnings.push(QuoteWarning::InvalidDimension {
                field: field.to_string(),
                value: value.to_string(),
            });
            0.0
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
