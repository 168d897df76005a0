//! # Engine Entry Points
//!
//! The function-call API the form/chat layer and the proposal renderer use.
//!
//! ## Control Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  LineItemInput ──► LineItemCalculator ──► PowerModel ──► Assembler ──► Quote
//! │                          (costs)            (watts)       (rounding)    │
//! │                                                                         │
//! │  [Quote, Quote, …] ──► Aggregator ──► Assembler ──► AggregateQuote      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every call is a pure function of its arguments: no shared state, no I/O,
//! safe to call from any number of threads at once.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::aggregate::{aggregate_quotes, AggregateOptions};
use crate::assembler::assemble_line_item;
use crate::calculator::LineItemCalculator;
use crate::error::{QuoteError, QuoteResult};
use crate::power::PowerEstimate;
use crate::quote::{AggregateQuote, Quote};
use crate::rules::RuleSet;
use crate::types::LineItemInput;

/// Line item quotes together with their aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PricedQuote {
    pub line_items: Vec<Quote>,
    pub aggregate: AggregateQuote,
}

/// Prices one line item.
///
/// ## Example
/// ```rust
/// use lumen_core::{price_line_item, LineItemInput, RuleSet};
///
/// let input = LineItemInput::new(10.0, 5.0).with_margin(30.0);
/// let quote = price_line_item(&input, &RuleSet::default()).unwrap();
///
/// assert_eq!(quote.total_internal_cost.units(), 57_200);
/// assert_eq!(quote.sell_price.units(), 81_714);
/// assert_eq!(quote.power_amps, 15);
/// ```
///
/// ## Errors
/// - [`QuoteError::InvalidMargin`] when the margin is not in `[0, 100)`
/// - [`QuoteError::Overflow`] when the item is too large to price
pub fn price_line_item(input: &LineItemInput, rules: &RuleSet) -> QuoteResult<Quote> {
    let costing = LineItemCalculator::new(rules).compute(input)?;
    let power = PowerEstimate::estimate(costing.figures.screen_area, input.environment, rules);
    assemble_line_item(costing.with_power(power))
}

/// Prices every item and aggregates them.
///
/// Stops at the first item that cannot be priced, tagging the error with
/// the item's index; later items are not priced and no partial aggregate is
/// produced.
pub fn price_line_items(
    inputs: &[LineItemInput],
    rules: &RuleSet,
    options: &AggregateOptions,
) -> QuoteResult<PricedQuote> {
    let line_items = inputs
        .iter()
        .enumerate()
        .map(|(index, input)| {
            price_line_item(input, rules).map_err(|source| QuoteError::LineItemFailed {
                index,
                source: Box::new(source),
            })
        })
        .collect::<QuoteResult<Vec<Quote>>>()?;
    let aggregate = aggregate_quotes(&line_items, options)?;

    Ok(PricedQuote {
        line_items,
        aggregate,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
