//! # Error Types
//!
//! Domain-specific error types for lumen-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  lumen-core errors (this file)                                         │
//! │  ├── QuoteError       - Fatal to one calculation (margin, aggregation) │
//! │  └── ValidationError  - Input checks, some downgraded to warnings      │
//! │                                                                         │
//! │  lumen-rules errors (separate crate)                                   │
//! │  └── RulesError       - Rule table load/validation failures            │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── CliError         - What the caller sees (code + message + field)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Fatal vs. Lenient
//! A margin of 100% or more has no markup (division by zero), so it fails the
//! calculation. A negative or non-finite dimension is normalized to zero and
//! reported as a [`crate::types::QuoteWarning`] instead; it never reaches the
//! arithmetic as NaN.

use thiserror::Error;

// =============================================================================
// Quote Error
// =============================================================================

/// Errors that stop a single quote calculation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuoteError {
    /// Target margin outside `[0, 100)`.
    ///
    /// ## When This Occurs
    /// - `target_margin_percent >= 100` (markup would be infinite)
    /// - negative or non-finite margin
    /// - aggregate margin override outside the same range
    #[error("Invalid margin {margin_percent}%: must be at least 0 and below 100")]
    InvalidMargin { margin_percent: f64 },

    /// An intermediate figure overflowed to infinity or NaN.
    #[error("Calculation produced a non-finite value for {field}")]
    NonFinite { field: String },

    /// A figure grew past the largest amount the engine prices to the unit.
    ///
    /// ## When This Occurs
    /// - huge dimensions or rates on one line item
    /// - many large line items summed into one aggregate
    #[error("Calculation for {field} exceeds the largest supported amount")]
    Overflow { field: String },

    /// Aggregation was asked to fold zero quotes.
    #[error("Cannot aggregate an empty list of quotes")]
    EmptyAggregate,

    /// One line item of a multi-item quote failed; nothing is aggregated.
    #[error("Line item {index} failed: {source}")]
    LineItemFailed {
        index: usize,
        #[source]
        source: Box<QuoteError>,
    },

    /// An assembled quote broke one of its own invariants.
    #[error("Quote invariant violated: {0}")]
    InvariantViolated(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl QuoteError {
    /// The input field responsible for this error, when there is one.
    ///
    /// The surrounding system shows this next to the message so the user
    /// knows which value to correct.
    pub fn field(&self) -> Option<&str> {
        match self {
            QuoteError::InvalidMargin { .. } => Some("targetMarginPercent"),
            QuoteError::NonFinite { field } | QuoteError::Overflow { field } => Some(field),
            QuoteError::LineItemFailed { source, .. } => source.field(),
            QuoteError::Validation(err) => Some(err.field()),
            QuoteError::EmptyAggregate | QuoteError::InvariantViolated(_) => None,
        }
    }

    /// Index of the failing line item for multi-item quotes.
    pub fn line_index(&self) -> Option<usize> {
        match self {
            QuoteError::LineItemFailed { index, .. } => Some(*index),
            _ => None,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Width or height is negative, NaN or infinite.
    #[error("{field} must be a finite, non-negative number of feet (got {value})")]
    InvalidDimension { field: String, value: String },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be finite and zero or more.
    #[error("{field} must be a finite, non-negative number")]
    MustBeNonNegative { field: String },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::InvalidDimension { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::MustBeNonNegative { field } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with QuoteError.
pub type QuoteResult<T> = Result<T, QuoteError>;

// =============================================================================
// Unit Tests
// =============================================================================
