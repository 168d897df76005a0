//! # lumen-core: Quote Calculation Engine for LED Displays
//!
//! This crate turns a display description (size, product class, site
//! conditions) into an internal cost, a sell price and a per-category
//! breakdown. It is pure logic with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Lumen Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          Callers (form / chat layer, proposal renderer)         │   │
//! │  │       raw JSON ──► RawLineItem ──► LineItemInput                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ lumen-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌───────────┐  ┌──────────┐   │   │
//! │  │   │   rules   │  │ calculator │  │ assembler │  │aggregate │   │   │
//! │  │   │  RuleSet  │─►│  + power   │─►│  rounding │─►│  totals  │   │   │
//! │  │   └───────────┘  └────────────┘  └───────────┘  └──────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO GLOBAL STATE • PURE FUNCTIONS                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          lumen-rules (rate tables from TOML + env)              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Inputs, categorical fields, breakdown and warnings
//! - [`rules`] - The rate table (`RuleSet`) and its lookups
//! - [`parse`] - Lenient numeric parsing for form and chat input
//! - [`validation`] - Margin, dimension and rate checks
//! - [`calculator`] - The per-item costing pipeline
//! - [`power`] - Wattage and amperage estimate
//! - [`assembler`] - Rounding into public quotes
//! - [`aggregate`] - Multi-screen totals
//! - [`engine`] - The entry points
//! - [`money`] - Whole-unit currency amounts
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input and same rule set give the same quote
//! 2. **Round Once**: figures stay unrounded until the assembler
//! 3. **Rules Are Data**: every rate lives in [`RuleSet`], never in code paths
//! 4. **Explicit Errors**: out-of-range margins fail; bad dimensions warn
//!
//! ## Example Usage
//!
//! ```rust
//! use lumen_core::{price_line_item, Environment, LineItemInput, RuleSet};
//!
//! let rules = RuleSet::default();
//! let input = LineItemInput::new(10.0, 5.0)
//!     .with_label("Lobby Wall")
//!     .with_environment(Environment::Indoor)
//!     .with_margin(30.0);
//!
//! let quote = price_line_item(&input, &rules).unwrap();
//! assert_eq!(quote.sell_price.to_string(), "$81,714");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregate;
pub mod assembler;
pub mod calculator;
pub mod engine;
pub mod error;
pub mod figures;
pub mod money;
pub mod parse;
pub mod power;
pub mod quote;
pub mod rules;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use aggregate::{aggregate_quotes, aggregate_results, AggregateOptions};
pub use engine::{price_line_item, price_line_items, PricedQuote};
pub use error::{QuoteError, QuoteResult, ValidationError};
pub use money::Money;
pub use quote::{AggregateQuote, Quote};
pub use rules::RuleSet;
pub use types::*;
