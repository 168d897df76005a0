//! # Validation Module
//!
//! Input checks that run before any arithmetic.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Outcomes                                │
//! │                                                                         │
//! │  Margin ≥ 100, < 0, NaN  ──► QuoteError::InvalidMargin   (fatal)        │
//! │                                                                         │
//! │  Width/height < 0, NaN   ──► ValidationError::InvalidDimension          │
//! │                              caught by the calculator, priced as 0,     │
//! │                              surfaced as QuoteWarning                   │
//! │                                                                         │
//! │  Pitch ≤ 0, NaN          ──► treated as absent, QuoteWarning            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{QuoteError, QuoteResult, ValidationError};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Checks a margin percentage and returns it as a fraction in `[0, 1)`.
///
/// ## Example
/// ```rust
/// use lumen_core::validation::margin_fraction;
///
/// assert_eq!(margin_fraction(30.0).unwrap(), 0.3);
/// assert!(margin_fraction(100.0).is_err());
/// ```
pub fn margin_fraction(margin_percent: f64) -> QuoteResult<f64> {
    if !margin_percent.is_finite() || margin_percent < 0.0 || margin_percent >= 100.0 {
        return Err(QuoteError::InvalidMargin { margin_percent });
    }
    Ok(margin_percent / 100.0)
}

/// Converts a margin percentage into a cost-to-sell multiplier.
///
/// `markup = 1 / (1 - margin)`; 30% margin is a markup of about 1.4286.
pub fn markup_multiplier(margin_percent: f64) -> QuoteResult<f64> {
    let fraction = margin_fraction(margin_percent)?;
    Ok(1.0 / (1.0 - fraction))
}

/// Checks one dimension in feet.
pub fn validate_dimension(field: &str, value: f64) -> ValidationResult<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::InvalidDimension {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Ok(value)
}

/// Checks an optional pixel pitch; `Ok(None)` when absent.
pub fn validate_pixel_pitch(pitch_mm: Option<f64>) -> ValidationResult<Option<f64>> {
    match pitch_mm {
        None => Ok(None),
        Some(pitch) if pitch.is_finite() && pitch > 0.0 => Ok(Some(pitch)),
        Some(_) => Err(ValidationError::MustBePositive {
            field: "pixelPitchMm".to_string(),
        }),
    }
}

/// Checks a rate table entry: finite and non-negative.
pub fn validate_rate(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
