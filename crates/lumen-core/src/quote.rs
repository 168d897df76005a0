//! # Quote Output Types
//!
//! The public, rounded shapes handed to the proposal renderer.
//!
//! Both are plain value objects: built once by the assembler, never mutated,
//! owned by whoever asked for them.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::figures::{CategoryFigures, QuoteFigures};
use crate::money::Money;
use crate::types::{CostBreakdown, LineItemWarning, QuoteWarning};

/// A priced line item.
///
/// ## JSON Shape
/// ```json
/// {
///   "label": "Main Board",
///   "screenArea": 50.0,
///   "breakdown": {
///     "hardware":   { "internal": 40000, "sell": 57143 },
///     "structural": { "internal": 8000,  "sell": 11429 },
///     "labor":      { "internal": 7200,  "sell": 10286 },
///     "expense":    { "internal": 2000,  "sell": 2857 }
///   },
///   "totalInternalCost": 57200,
///   "sellPrice": 81714,
///   "marginPercent": 30.0,
///   "effectiveMarginPercent": 30.0,
///   "totalWatts": 1750,
///   "powerAmps": 15,
///   "warnings": []
/// }
/// ```
///
/// ## Rounding Tolerance
/// Every field is rounded on its own, so the category sell prices may add up
/// to a slightly different number than `sellPrice`: at most one unit per
/// category (see [`Quote::rounding_tolerance`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Quote {
    pub label: Option<String>,
    /// Square feet, two decimals.
    pub screen_area: f64,
    pub breakdown: CostBreakdown,
    pub total_internal_cost: Money,
    pub sell_price: Money,
    /// Margin used for the markup.
    pub margin_percent: f64,
    /// Realized margin including contingency and bond, two decimals.
    pub effective_margin_percent: f64,
    pub total_watts: i64,
    pub power_amps: i64,
    pub warnings: Vec<QuoteWarning>,
    /// Unrounded figures kept for aggregation; absent on deserialized quotes.
    #[serde(skip)]
    #[ts(skip)]
    pub(crate) figures: Option<QuoteFigures>,
}

impl Quote {
    /// Largest allowed gap between the summed category sell prices and
    /// `sell_price`.
    pub fn rounding_tolerance(&self) -> i64 {
        self.breakdown.len() as i64
    }

    /// Sum of the rounded category sell prices.
    pub fn breakdown_sell_total(&self) -> Money {
        self.breakdown.values().map(|amount| amount.sell).sum()
    }

    /// Sum of the rounded category internal costs.
    pub fn breakdown_internal_total(&self) -> Money {
        self.breakdown.values().map(|amount| amount.internal).sum()
    }

    /// Full-precision figures behind this quote.
    ///
    /// Quotes that came from [`crate::price_line_item`] carry their exact
    /// figures. A quote rebuilt from JSON only has rounded values, which are
    /// used instead.
    pub fn figures(&self) -> QuoteFigures {
        if let Some(figures) = &self.figures {
            return figures.clone();
        }

        QuoteFigures {
            screen_area: self.screen_area,
            breakdown: self
                .breakdown
                .iter()
                .map(|(category, amount)| {
                    (
                        *category,
                        CategoryFigures {
                            internal: amount.internal.as_f64(),
                            sell: amount.sell.as_f64(),
                        },
                    )
                })
                .collect(),
            total_internal_cost: self.total_internal_cost.as_f64(),
            sell_price: self.sell_price.as_f64(),
            total_watts: self.total_watts as f64,
            power_amps: self.power_amps,
        }
    }
}

/// Several line items folded into one quote.
///
/// `margin_percent` is the caller's override, or the margin every item shares.
/// When items used different margins it is `None`; no blended figure is
/// computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AggregateQuote {
    pub line_count: usize,
    pub screen_area: f64,
    pub breakdown: CostBreakdown,
    pub total_internal_cost: Money,
    pub sell_price: Money,
    pub margin_percent: Option<f64>,
    pub total_watts: i64,
    pub power_amps: i64,
    pub warnings: Vec<LineItemWarning>,
}

impl AggregateQuote {
    /// Largest allowed gap between the summed category sell prices and
    /// `sell_price`.
    pub fn rounding_tolerance(&self) -> i64 {
        self.breakdown.len() as i64
    }

    /// Sum of the rounded category sell prices.
    pub fn breakdown_sell_total(&self) -> Money {
        self.breakdown.values().map(|amount| amount.sell).sum()
    }

    /// True when items used differing margins and no override was given.
    pub fn has_mixed_margins(&self) -> bool {
        self.margin_percent.is_none()
    }
}
