//! # Rules Error Types
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │     Loading     │  │    Contents     │  │       Rendering         │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  LoadFailed     │  │  InvalidRule    │  │  RenderFailed           │ │
//! │  │  NotFound       │  │  Validation     │  │                         │ │
//! │  │  ParseFailed    │  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use lumen_core::ValidationError;
use thiserror::Error;

/// Result type alias for rules operations.
pub type RulesResult<T> = Result<T, RulesError>;

/// Everything that can go wrong while loading, validating or rendering a
/// rate table.
#[derive(Debug, Error)]
pub enum RulesError {
    // =========================================================================
    // Loading Errors
    // =========================================================================
    /// A rules file that was asked for explicitly does not exist.
    #[error("Rules file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but could not be read.
    #[error("Failed to read rules file: {0}")]
    LoadFailed(String),

    /// The file is not valid TOML or has wrongly typed fields.
    #[error("Failed to parse rules file: {0}")]
    ParseFailed(String),

    // =========================================================================
    // Content Errors
    // =========================================================================
    /// A table entry has a value the engine cannot price with.
    #[error("Invalid rule {field}: {reason}")]
    InvalidRule { field: String, reason: String },

    /// A rate failed the core range checks.
    #[error("Invalid rule: {0}")]
    Validation(#[from] ValidationError),

    // =========================================================================
    // Rendering Errors
    // =========================================================================
    /// The effective table could not be serialized back to TOML.
    #[error("Failed to render rules as TOML: {0}")]
    RenderFailed(String),
}

impl From<std::io::Error> for RulesError {
    fn from(err: std::io::Error) -> Self {
        RulesError::LoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for RulesError {
    fn from(err: toml::de::Error) -> Self {
        RulesError::ParseFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for RulesError {
    fn from(err: toml::ser::Error) -> Self {
        RulesError::RenderFailed(err.to_string())
    }
}

impl RulesError {
    /// The rule table field at fault, dotted (`fees.default_margin_percent`).
    pub fn field(&self) -> Option<&str> {
        match self {
            RulesError::InvalidRule { field, .. } => Some(field),
            RulesError::Validation(err) => Some(err.field()),
            _ => None,
        }
    }

    /// True when the table itself is wrong, as opposed to the file access.
    pub fn is_content_error(&self) -> bool {
        matches!(
            self,
            RulesError::ParseFailed(_) | RulesError::InvalidRule { .. } | RulesError::Validation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_is_reported() {
        let err = RulesError::InvalidRule {
            field: "power.reference_voltage".into(),
            reason: "must be greater than 0".into(),
        };
        assert_eq!(err.field(), Some("power.reference_voltage"));
        assert!(err.is_content_error());
        assert!(err.to_string().contains("power.reference_voltage"));
    }

    #[test]
    fn test_io_errors_are_not_content_errors() {
        let err: RulesError = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert!(!err.is_content_error());
        assert_eq!(err.field(), None);
    }

    #[test]
    fn test_render_failure_is_not_a_content_error() {
        let err = RulesError::RenderFailed("unsupported value".into());
        assert!(!err.is_content_error());
        assert_eq!(err.field(), None);
        assert_eq!(
            err.to_string(),
            "Failed to render rules as TOML: unsupported value"
        );
    }

    #[test]
    fn test_not_found_names_the_path() {
        let err = RulesError::NotFound(PathBuf::from("/tmp/rules.toml"));
        assert!(err.to_string().contains("/tmp/rules.toml"));
    }
}
