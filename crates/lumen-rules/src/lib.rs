//! # lumen-rules: Rate Tables for Lumen
//!
//! Loads the pricing [`RuleSet`](lumen_core::RuleSet) from a TOML file and
//! `LUMEN_*` environment variables, validates it, and keeps the live table
//! for long-running callers.
//!
//! ## Modules
//!
//! - [`loader`] - Defaults, file and environment layering plus validation
//! - [`handle`] - `RuleSetHandle`, the atomically swappable table
//! - [`error`] - Rules error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use lumen_core::{price_line_item, LineItemInput};
//! use lumen_rules::{load_or_default, RuleSetHandle};
//!
//! let handle = RuleSetHandle::new(load_or_default(None));
//! let rules = handle.snapshot();
//! let quote = price_line_item(&LineItemInput::new(12.0, 6.0), &rules).unwrap();
//! println!("{}", quote.sell_price);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod handle;
pub mod loader;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{RulesError, RulesResult};
pub use handle::RuleSetHandle;
pub use loader::{
    default_config_path, load, load_file, load_from_str, load_or_default, load_with, to_toml,
    validate,
};
