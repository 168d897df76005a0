//! # Aggregator
//!
//! Folds several priced line items into one [`AggregateQuote`].
//!
//! ## Merge Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Screen A                Screen B                Aggregate              │
//! │  hardware    57142.86    hardware    71428.57    hardware   128571.43   │
//! │  contingency     -       contingency  5928.57    contingency  5928.57   │
//! │  sellPrice   81714.29    sellPrice  125745.00    sellPrice  207459.29   │
//! │                                                                         │
//! │  • numeric totals add                                                   │
//! │  • breakdown merges key-wise (missing key = 0), canonical key order     │
//! │  • sums use UNROUNDED figures; rounding happens once, in the assembler  │
//! │  • margin: override > shared value > None (never averaged)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::assembler::assemble_aggregate;
use crate::error::{QuoteError, QuoteResult};
use crate::figures::QuoteFigures;
use crate::quote::{AggregateQuote, Quote};
use crate::types::LineItemWarning;
use crate::validation::margin_fraction;

/// Two margins closer than this are the same margin.
const MARGIN_EPSILON: f64 = 1e-9;

/// Caller options for aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateOptions {
    /// Margin to label the aggregate with. Only a label: the totals are not
    /// re-derived from it.
    pub margin_override: Option<f64>,
}

impl AggregateOptions {
    pub fn with_margin_override(margin_percent: f64) -> Self {
        AggregateOptions {
            margin_override: Some(margin_percent),
        }
    }
}

/// Aggregates a non-empty list of quotes.
///
/// ## Errors
/// - [`QuoteError::EmptyAggregate`] for an empty slice
/// - [`QuoteError::InvalidMargin`] for an override outside `[0, 100)`
/// - [`QuoteError::Overflow`] when the summed figures grow too large
pub fn aggregate_quotes(items: &[Quote], options: &AggregateOptions) -> QuoteResult<AggregateQuote> {
    if items.is_empty() {
        return Err(QuoteError::EmptyAggregate);
    }
    if let Some(margin) = options.margin_override {
        margin_fraction(margin)?;
    }

    let mut totals = QuoteFigures::default();
    let mut warnings = Vec::new();
    for (index, quote) in items.iter().enumerate() {
        totals.merge(&quote.figures());
        warnings.extend(quote.warnings.iter().cloned().map(|warning| LineItemWarning {
            index,
            warning,
        }));
    }

    let margin_percent = options
        .margin_override
        .or_else(|| shared_margin(items));

    debug!(
        lines = items.len(),
        sell = totals.sell_price,
        margin = ?margin_percent,
        "Aggregated line items"
    );

    assemble_aggregate(&totals, items.len(), margin_percent, warnings)
}

/// Aggregates per-item results, refusing to aggregate if any item failed.
///
/// The first failure is returned with its position so the caller can point
/// at the offending line.
pub fn aggregate_results(
    results: Vec<QuoteResult<Quote>>,
    options: &AggregateOptions,
) -> QuoteResult<AggregateQuote> {
    let quotes = collect_line_items(results)?;
    aggregate_quotes(&quotes, options)
}

/// Unwraps per-item results, failing fast on the first error.
fn collect_line_items(results: Vec<QuoteResult<Quote>>) -> QuoteResult<Vec<Quote>> {
    results
        .into_iter()
        .enumerate()
        .map(|(index, result)| {
            result.map_err(|source| QuoteError::LineItemFailed {
                index,
                source: Box::new(source),
            })
        })
        .collect()
}

/// The margin every item used, or `None` when they differ.
fn shared_margin(items: &[Quote]) -> Option<f64> {
    let first = items.first()?.margin_percent;
    items
        .iter()
        .all(|quote| (quote.margin_percent - first).abs() < MARGIN_EPSILON)
        .then_some(first)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::price_line_item;
    use crate::rules::RuleSet;
    use crate::types::{CostCategory, Environment, LineItemInput, QuoteWarning, StructureStatus};

    fn quote(input: LineItemInput) -> Quote {
        price_line_item(&input, &RuleSet::default()).unwrap()
    }

    fn indoor() -> Quote {
        quote(LineItemInput::new(10.0, 5.0).with_margin(30.0))
    }

    fn outdoor_new() -> Quote {
        quote(
            LineItemInput::new(10.0, 5.0)
                .with_environment(Environment::Outdoor)
                .with_structure_status(StructureStatus::New)
                .with_margin(30.0),
        )
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert_eq!(
            aggregate_quotes(&[], &AggregateOptions::default()),
            Err(QuoteError::EmptyAggregate)
        );
    }

    #[test]
    fn test_totals_add_and_breakdown_merges_key_wise() {
        let a = indoor();
        let b = outdoor_new();
        let aggregate = aggregate_quotes(&[a.clone(), b.clone()], &AggregateOptions::default()).unwrap();

        assert_eq!(aggregate.line_count, 2);
        assert_eq!(aggregate.screen_area, 100.0);
        assert_eq!(aggregate.power_amps, a.power_amps + b.power_amps);
        assert_eq!(aggregate.total_watts, 1750 + 3250);

        // Contingency only exists on b; it carries over unchanged.
        assert_eq!(
            aggregate.breakdown[&CostCategory::Contingency],
            b.breakdown[&CostCategory::Contingency]
        );
        let keys: Vec<_> = aggregate.breakdown.keys().copied().collect();
        assert_eq!(keys, CostCategory::ALL[..5].to_vec());

        let summed = a.sell_price + b.sell_price;
        assert!((aggregate.sell_price - summed).abs().units() <= aggregate.rounding_tolerance());
    }

    #[test]
    fn test_order_does_not_change_numbers() {
        let ab = aggregate_quotes(&[indoor(), outdoor_new()], &AggregateOptions::default()).unwrap();
        let ba = aggregate_quotes(&[outdoor_new(), indoor()], &AggregateOptions::default()).unwrap();

        assert_eq!(ab.sell_price, ba.sell_price);
        assert_eq!(ab.total_internal_cost, ba.total_internal_cost);
        assert_eq!(ab.breakdown, ba.breakdown);
    }

    #[test]
    fn test_shared_margin_is_kept() {
        let aggregate = aggregate_quotes(&[indoor(), outdoor_new()], &AggregateOptions::default()).unwrap();
        assert_eq!(aggregate.margin_percent, Some(30.0));
    }

    #[test]
    fn test_mixed_margins_are_not_averaged() {
        let thin = quote(LineItemInput::new(10.0, 5.0).with_margin(20.0));
        let aggregate = aggregate_quotes(&[indoor(), thin], &AggregateOptions::default()).unwrap();
        assert_eq!(aggregate.margin_percent, None);
        assert!(aggregate.has_mixed_margins());
    }

    #[test]
    fn test_override_labels_without_repricing() {
        let items = [indoor(), outdoor_new()];
        let plain = aggregate_quotes(&items, &AggregateOptions::default()).unwrap();
        let labelled =
            aggregate_quotes(&items, &AggregateOptions::with_margin_override(35.0)).unwrap();

        assert_eq!(labelled.margin_percent, Some(35.0));
        assert_eq!(labelled.sell_price, plain.sell_price);
    }

    #[test]
    fn test_override_of_100_is_rejected() {
        let result = aggregate_quotes(&[indoor()], &AggregateOptions::with_margin_override(100.0));
        assert!(matches!(result, Err(QuoteError::InvalidMargin { .. })));
    }

    #[test]
    fn test_any_failed_item_blocks_aggregation() {
        let failed = price_line_item(
            &LineItemInput::new(10.0, 5.0).with_margin(100.0),
            &RuleSet::default(),
        );
        let result = aggregate_results(vec![Ok(indoor()), failed], &AggregateOptions::default());

        let err = result.unwrap_err();
        assert_eq!(err.line_index(), Some(1));
        assert_eq!(err.field(), Some("targetMarginPercent"));
    }

    #[test]
    fn test_totals_past_the_largest_amount_are_rejected() {
        let huge = quote(LineItemInput::new(6e5, 6e5).with_margin(30.0));
        assert!(huge.sell_price.units() > 500_000_000_000_000);

        let result = aggregate_quotes(&[huge.clone(), huge], &AggregateOptions::default());
        assert_eq!(
            result,
            Err(QuoteError::Overflow {
                field: "sellPrice".to_string()
            })
        );
    }

    #[test]
    fn test_saturated_deserialized_quote_is_rejected() {
        let mut json = serde_json::to_value(indoor()).unwrap();
        json["sellPrice"] = serde_json::json!(i64::MAX);
        let restored: Quote = serde_json::from_value(json).unwrap();

        let result = aggregate_quotes(&[restored.clone(), restored], &AggregateOptions::default());
        assert!(matches!(result, Err(QuoteError::Overflow { .. })));
    }

    #[test]
    fn test_item_warnings_are_indexed() {
        let warned = quote(LineItemInput::new(-1.0, 5.0));
        let aggregate = aggregate_quotes(&[indoor(), warned], &AggregateOptions::default()).unwrap();

        assert_eq!(aggregate.warnings.len(), 1);
        assert_eq!(aggregate.warnings[0].index, 1);
        assert!(matches!(
            aggregate.warnings[0].warning,
            QuoteWarning::InvalidDimension { .. }
        ));
    }

    #[test]
    fn test_deserialized_quotes_aggregate_from_rounded_values() {
        let json = serde_json::to_string(&indoor()).unwrap();
        let restored: Quote = serde_json::from_str(&json).unwrap();
        let aggregate = aggregate_quotes(&[restored.clone(), restored], &AggregateOptions::default()).unwrap();

        assert_eq!(aggregate.sell_price.units(), 2 * 81_714);
        assert_eq!(aggregate.total_internal_cost.units(), 2 * 57_200);
    }
}
