//! # Unrounded Figures
//!
//! Full-precision numbers that flow between calculator, power model,
//! aggregator and assembler. Nothing in here is rounded; the assembler is the
//! only place that turns these into [`crate::money::Money`].

use std::collections::BTreeMap;

use crate::error::{QuoteError, QuoteResult};
use crate::types::CostCategory;

/// Largest magnitude any figure may reach. Past 1e15 an f64 no longer
/// resolves whole units, so rounded categories could drift from the rounded
/// total by more than the tolerance.
pub const MAX_AMOUNT: f64 = 1e15;

/// Internal cost and sell price of one category, unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CategoryFigures {
    pub internal: f64,
    pub sell: f64,
}

impl CategoryFigures {
    /// A category whose sell price is its internal cost times `markup`.
    pub fn marked_up(internal: f64, markup: f64) -> Self {
        CategoryFigures {
            internal,
            sell: internal * markup,
        }
    }

    /// A sell-side-only charge (contingency, bond) with no internal cost.
    pub fn sell_only(sell: f64) -> Self {
        CategoryFigures {
            internal: 0.0,
            sell,
        }
    }
}

/// Figures for one line item or for a whole aggregate.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuoteFigures {
    pub screen_area: f64,
    pub breakdown: BTreeMap<CostCategory, CategoryFigures>,
    /// Hardware + structural + labor + expense, before markup.
    pub total_internal_cost: f64,
    pub sell_price: f64,
    pub total_watts: f64,
    pub power_amps: i64,
}

impl QuoteFigures {
    /// Adds another set of figures key-wise. Missing categories count as zero.
    pub fn merge(&mut self, other: &QuoteFigures) {
        self.screen_area += other.screen_area;
        self.total_internal_cost += other.total_internal_cost;
        self.sell_price += other.sell_price;
        self.total_watts += other.total_watts;
        self.power_amps = self.power_amps.saturating_add(other.power_amps);

        for (category, figures) in &other.breakdown {
            let entry = self.breakdown.entry(*category).or_default();
            entry.internal += figures.internal;
            entry.sell += figures.sell;
        }
    }

    /// Sum of the sell prices of the marked-up categories only.
    pub fn marked_up_sell(&self) -> f64 {
        CostCategory::MARKED_UP
            .iter()
            .filter_map(|category| self.breakdown.get(category))
            .map(|figures| figures.sell)
            .sum()
    }

    /// Sell price of one category, zero when absent.
    pub fn sell_of(&self, category: CostCategory) -> f64 {
        self.breakdown
            .get(&category)
            .map(|figures| figures.sell)
            .unwrap_or(0.0)
    }

    /// Rejects NaN, infinite or oversized values anywhere in the figures.
    ///
    /// ## Errors
    /// - [`QuoteError::NonFinite`] for NaN or infinity
    /// - [`QuoteError::Overflow`] for a magnitude above [`MAX_AMOUNT`]
    pub fn ensure_representable(&self) -> QuoteResult<()> {
        let check = |field: String, value: f64| {
            if !value.is_finite() {
                Err(QuoteError::NonFinite { field })
            } else if value.abs() > MAX_AMOUNT {
                Err(QuoteError::Overflow { field })
            } else {
                Ok(())
            }
        };

        check("screenArea".to_string(), self.screen_area)?;
        for (category, figures) in &self.breakdown {
            check(format!("breakdown.{}.internal", category), figures.internal)?;
            check(format!("breakdown.{}.sell", category), figures.sell)?;
        }
        check("totalInternalCost".to_string(), self.total_internal_cost)?;
        check("sellPrice".to_string(), self.sell_price)?;
        check("totalWatts".to_string(), self.total_watts)?;
        check("powerAmps".to_string(), self.power_amps as f64)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn figures(hardware: f64, bond: Option<f64>) -> QuoteFigures {
        let mut breakdown = BTreeMap::new();
        breakdown.insert(CostCategory::Hardware, CategoryFigures::marked_up(hardware, 2.0));
        if let Some(bond) = bond {
            breakdown.insert(CostCategory::Bond, CategoryFigures::sell_only(bond));
        }
        let sell = hardware * 2.0 + bond.unwrap_or(0.0);
        QuoteFigures {
            screen_area: 10.0,
            breakdown,
            total_internal_cost: hardware,
            sell_price: sell,
            total_watts: 350.0,
            power_amps: 3,
        }
    }

    #[test]
    fn test_merge_is_key_wise() {
        let mut total = figures(100.0, None);
        total.merge(&figures(50.0, Some(4.0)));

        assert_eq!(total.screen_area, 20.0);
        assert_eq!(total.total_internal_cost, 150.0);
        assert_eq!(total.sell_price, 304.0);
        assert_eq!(total.power_amps, 6);
        assert_eq!(total.breakdown[&CostCategory::Hardware].sell, 300.0);
        assert_eq!(total.breakdown[&CostCategory::Bond], CategoryFigures::sell_only(4.0));
    }

    #[test]
    fn test_marked_up_sell_excludes_fees() {
        let f = figures(100.0, Some(4.0));
        assert_eq!(f.marked_up_sell(), 200.0);
        assert_eq!(f.sell_of(CostCategory::Bond), 4.0);
        assert_eq!(f.sell_of(CostCategory::Contingency), 0.0);
    }

    #[test]
    fn test_non_finite_names_field() {
        let mut f = figures(100.0, None);
        assert!(f.ensure_representable().is_ok());

        f.breakdown
            .insert(CostCategory::Labor, CategoryFigures::marked_up(f64::INFINITY, 1.0));
        assert_eq!(
            f.ensure_representable(),
            Err(QuoteError::NonFinite {
                field: "breakdown.labor.internal".to_string()
            })
        );
    }

    #[test]
    fn test_oversized_amount_is_an_overflow() {
        assert!(figures(MAX_AMOUNT / 4.0, None).ensure_representable().is_ok());

        let mut f = figures(100.0, None);
        f.sell_price = MAX_AMOUNT * 2.0;
        assert_eq!(
            f.ensure_representable(),
            Err(QuoteError::Overflow {
                field: "sellPrice".to_string()
            })
        );
    }

    #[test]
    fn test_merged_amps_saturate_then_overflow() {
        let mut f = figures(100.0, None);
        f.power_amps = i64::MAX;
        f.merge(&figures(100.0, None));

        assert_eq!(f.power_amps, i64::MAX);
        assert_eq!(
            f.ensure_representable(),
            Err(QuoteError::Overflow {
                field: "powerAmps".to_string()
            })
        );
    }
}
