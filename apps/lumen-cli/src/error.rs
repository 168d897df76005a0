//! # CLI Error Type
//!
//! Unified error type for CLI commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  QuoteError ─┐                                                          │
//! │  RulesError ─┼──► CliError { code, message, field } ──► stdout (JSON)   │
//! │  io / JSON  ─┘                                          exit code 1     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ```json
//! {
//!   "code": "INVALID_MARGIN",
//!   "message": "Line item 1 failed: Invalid margin 100%: must be at least 0 and below 100",
//!   "field": "items[1].targetMarginPercent"
//! }
//! ```

use lumen_core::QuoteError;
use lumen_rules::RulesError;
use serde::Serialize;
use thiserror::Error;

/// Error printed by the CLI when a command fails.
#[derive(Debug, Clone, Error, Serialize)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct CliError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// The input field to correct, when one is known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Error codes for CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Margin outside [0, 100)
    InvalidMargin,

    /// Input value the engine cannot use
    ValidationError,

    /// No line items to price
    EmptyQuote,

    /// Input file is not valid line item JSON
    InvalidInput,

    /// Rules file missing, unreadable or invalid
    RulesError,

    /// File system access failed
    IoError,

    /// Engine invariant broken
    Internal,
}

impl CliError {
    /// Creates a new CLI error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
            field: None,
        }
    }

    /// Attaches the offending field.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::InvalidInput, message)
    }

    /// JSON for stdout; falls back to the plain message.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.message.clone())
    }
}

/// Converts engine errors to CLI errors.
impl From<QuoteError> for CliError {
    fn from(err: QuoteError) -> Self {
        let message = err.to_string();
        let field = match (err.line_index(), err.field()) {
            (Some(index), Some(field)) => Some(format!("items[{}].{}", index, field)),
            (Some(index), None) => Some(format!("items[{}]", index)),
            (None, field) => field.map(str::to_string),
        };

        let code = match root_cause(&err) {
            QuoteError::InvalidMargin { .. } => ErrorCode::InvalidMargin,
            QuoteError::EmptyAggregate => ErrorCode::EmptyQuote,
            QuoteError::Validation(_)
            | QuoteError::NonFinite { .. }
            | QuoteError::Overflow { .. } => ErrorCode::ValidationError,
            QuoteError::InvariantViolated(_) => {
                tracing::error!("Quote invariant violated: {}", message);
                ErrorCode::Internal
            }
            QuoteError::LineItemFailed { .. } => ErrorCode::Internal,
        };

        CliError {
            code,
            message,
            field,
        }
    }
}

fn root_cause(err: &QuoteError) -> &QuoteError {
    match err {
        QuoteError::LineItemFailed { source, .. } => root_cause(source),
        other => other,
    }
}

/// Converts rules errors to CLI errors.
impl From<RulesError> for CliError {
    fn from(err: RulesError) -> Self {
        let field = err.field().map(|field| format!("rules.{}", field));
        CliError {
            code: ErrorCode::RulesError,
            message: err.to_string(),
            field,
        }
    }
}

/// Converts JSON errors to CLI errors.
impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::invalid_input(format!("Invalid line item JSON: {}", err))
    }
}

/// Converts I/O errors to CLI errors.
impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::new(ErrorCode::IoError, err.to_string())
    }
}

pub type CliResult<T> = Result<T, CliError>;
