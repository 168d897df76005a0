//! # Quote Assembler
//!
//! Rounds unrounded figures into the public [`Quote`] and [`AggregateQuote`]
//! shapes and checks them before they leave the engine.
//!
//! ## Rounding Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Each field is rounded to whole currency units ON ITS OWN.              │
//! │                                                                         │
//! │     hardware    57142.857 → 57143                                       │
//! │     structural  11428.571 → 11429                                       │
//! │     labor       10285.714 → 10286                                       │
//! │     expense      2857.143 →  2857                                       │
//! │                             ─────                                       │
//! │     Σ rounded               81715     sellPrice 81714.286 → 81714       │
//! │                                                                         │
//! │  The totals are NOT re-derived from rounded categories. The gap is      │
//! │  bounded by the category count and checked on every assembly.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use crate::calculator::LineItemCosting;
use crate::error::{QuoteError, QuoteResult};
use crate::figures::{CategoryFigures, QuoteFigures};
use crate::money::Money;
use crate::quote::{AggregateQuote, Quote};
use crate::types::{CategoryAmount, CostBreakdown, CostCategory, LineItemWarning};
use crate::validation::margin_fraction;

/// Builds the public quote for one costed line item.
pub fn assemble_line_item(costing: LineItemCosting) -> QuoteResult<Quote> {
    let LineItemCosting {
        label,
        figures,
        margin_percent,
        warnings,
    } = costing;

    figures.ensure_representable()?;
    margin_fraction(margin_percent)?;

    let breakdown = round_breakdown(&figures.breakdown);
    let total_internal_cost = Money::round_from(figures.total_internal_cost);
    let sell_price = Money::round_from(figures.sell_price);
    check_rounded_totals(&breakdown, total_internal_cost, sell_price)?;

    Ok(Quote {
        label,
        screen_area: round_area(figures.screen_area),
        breakdown,
        total_internal_cost,
        sell_price,
        margin_percent,
        effective_margin_percent: effective_margin(&figures, margin_percent),
        total_watts: figures.total_watts.round() as i64,
        power_amps: figures.power_amps,
        warnings,
        figures: Some(figures),
    })
}

/// Builds the public aggregate from already-merged figures.
pub fn assemble_aggregate(
    figures: &QuoteFigures,
    line_count: usize,
    margin_percent: Option<f64>,
    warnings: Vec<LineItemWarning>,
) -> QuoteResult<AggregateQuote> {
    figures.ensure_representable()?;
    if let Some(margin) = margin_percent {
        margin_fraction(margin)?;
    }

    let breakdown = round_breakdown(&figures.breakdown);
    let total_internal_cost = Money::round_from(figures.total_internal_cost);
    let sell_price = Money::round_from(figures.sell_price);
    check_rounded_totals(&breakdown, total_internal_cost, sell_price)?;

    Ok(AggregateQuote {
        line_count,
        screen_area: round_area(figures.screen_area),
        breakdown,
        total_internal_cost,
        sell_price,
        margin_percent,
        total_watts: figures.total_watts.round() as i64,
        power_amps: figures.power_amps,
        warnings,
    })
}

/// Rounds each category's internal and sell figure independently.
fn round_breakdown(breakdown: &BTreeMap<CostCategory, CategoryFigures>) -> CostBreakdown {
    breakdown
        .iter()
        .map(|(category, figures)| {
            (
                *category,
                CategoryAmount {
                    internal: Money::round_from(figures.internal),
                    sell: Money::round_from(figures.sell),
                },
            )
        })
        .collect()
}

/// Square feet to two decimals.
fn round_area(area: f64) -> f64 {
    (area * 100.0).round() / 100.0
}

/// Realized margin from unrounded totals, two decimals.
///
/// A zero-priced item (zero area) realizes nothing; it reports the target.
fn effective_margin(figures: &QuoteFigures, margin_percent: f64) -> f64 {
    if figures.sell_price <= 0.0 {
        return margin_percent;
    }
    let realized = (figures.sell_price - figures.total_internal_cost) / figures.sell_price * 100.0;
    (realized * 100.0).round() / 100.0
}

/// Checks the invariants of a rounded quote.
///
/// - no negative amounts
/// - sell price not below internal cost (margin is never negative)
/// - category sums within one unit per category of the rounded totals
fn check_rounded_totals(
    breakdown: &CostBreakdown,
    total_internal_cost: Money,
    sell_price: Money,
) -> QuoteResult<()> {
    let negative = breakdown
        .iter()
        .find(|(_, amount)| amount.internal.is_negative() || amount.sell.is_negative());
    if let Some((category, _)) = negative {
        return Err(QuoteError::InvariantViolated(format!(
            "{} has a negative amount",
            category
        )));
    }

    if total_internal_cost.is_negative() || sell_price < total_internal_cost {
        return Err(QuoteError::InvariantViolated(format!(
            "sell price {} is below internal cost {}",
            sell_price, total_internal_cost
        )));
    }

    let tolerance = breakdown.len() as i64;
    let sell_sum: Money = breakdown.values().map(|amount| amount.sell).sum();
    let internal_sum: Money = breakdown.values().map(|amount| amount.internal).sum();

    if (sell_sum - sell_price).abs().units() > tolerance
        || (internal_sum - total_internal_cost).abs().units() > tolerance
    {
        return Err(QuoteError::InvariantViolated(format!(
            "category sums ({} sell, {} internal) drift more than {} from totals ({}, {})",
            sell_sum, internal_sum, tolerance, sell_price, total_internal_cost
        )));
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn costing(parts: &[(CostCategory, f64, f64)], margin_percent: f64) -> LineItemCosting {
        let breakdown: BTreeMap<_, _> = parts
            .iter()
            .map(|(category, internal, sell)| {
                (
                    *category,
                    CategoryFigures {
                        internal: *internal,
                        sell: *sell,
                    },
                )
            })
            .collect();
        LineItemCosting {
            label: Some("Test".to_string()),
            figures: QuoteFigures {
                screen_area: 50.0 / 3.0,
                total_internal_cost: parts.iter().map(|p| p.1).sum(),
                sell_price: parts.iter().map(|p| p.2).sum(),
                breakdown,
                total_watts: 1750.4,
                power_amps: 15,
            },
            margin_percent,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_rounds_each_field_independently() {
        let quote = assemble_line_item(costing(
            &[
                (CostCategory::Hardware, 40_000.0, 57_142.857),
                (CostCategory::Structural, 8_000.0, 11_428.571),
                (CostCategory::Labor, 7_200.0, 10_285.714),
                (CostCategory::Expense, 2_000.0, 2_857.143),
            ],
            30.0,
        ))
        .unwrap();

        assert_eq!(quote.sell_price.units(), 81_714);
        assert_eq!(quote.breakdown_sell_total().units(), 81_715);
        assert!(
            (quote.breakdown_sell_total() - quote.sell_price).abs().units()
                <= quote.rounding_tolerance()
        );
        assert_eq!(quote.screen_area, 16.67);
        assert_eq!(quote.total_watts, 1750);
        assert_eq!(quote.effective_margin_percent, 30.0);
        assert!(quote.figures.is_some());
    }

    #[test]
    fn test_rejects_sell_below_internal() {
        let result = assemble_line_item(costing(
            &[(CostCategory::Hardware, 100.0, 90.0)],
            0.0,
        ));
        assert!(matches!(result, Err(QuoteError::InvariantViolated(_))));
    }

    #[test]
    fn test_rejects_out_of_range_margin() {
        let result = assemble_line_item(costing(
            &[(CostCategory::Hardware, 100.0, 100.0)],
            100.0,
        ));
        assert!(matches!(result, Err(QuoteError::InvalidMargin { .. })));
    }

    #[test]
    fn test_zero_priced_item_reports_target_margin() {
        let quote = assemble_line_item(costing(
            &[(CostCategory::Hardware, 0.0, 0.0)],
            25.0,
        ))
        .unwrap();
        assert_eq!(quote.effective_margin_percent, 25.0);
        assert!(quote.sell_price.is_zero());
    }

    #[test]
    fn test_aggregate_keeps_mixed_margin_as_none() {
        let figures = costing(&[(CostCategory::Hardware, 100.0, 150.0)], 30.0).figures;
        let aggregate = assemble_aggregate(&figures, 2, None, Vec::new()).unwrap();
        assert!(aggregate.has_mixed_margins());
        assert_eq!(aggregate.line_count, 2);
        assert_eq!(aggregate.sell_price.units(), 150);
    }
}
