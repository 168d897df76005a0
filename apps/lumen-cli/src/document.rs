//! # Input and Output Documents
//!
//! ## Input
//! ```json
//! {
//!   "marginOverride": 35,
//!   "items": [
//!     { "label": "Main Board", "width": "10 ft", "height": 5, "environment": "Outdoor" },
//!     { "label": "Ribbon", "width": 80, "height": 3, "productClass": "ribbon" }
//!   ]
//! }
//! ```
//! A bare array of items is accepted too.
//!
//! ## Output
//! ```json
//! {
//!   "id": "5b0c6c3e-…",
//!   "generatedAt": "2026-10-18T14:03:11Z",
//!   "lineItems": [ … ],
//!   "aggregate": { … }
//! }
//! ```

use chrono::{DateTime, Utc};
use lumen_core::{AggregateQuote, LineItemInput, PricedQuote, Quote, RawLineItem};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CliError, CliResult};

/// Line items to price, as read from the input file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    #[serde(alias = "lineItems")]
    pub items: Vec<RawLineItem>,
    #[serde(default)]
    pub margin_override: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RequestShape {
    Items(Vec<RawLineItem>),
    Request(QuoteRequest),
}

impl QuoteRequest {
    /// Parses either request shape.
    pub fn from_json(contents: &str) -> CliResult<Self> {
        let shape: RequestShape = serde_json::from_str(contents).map_err(|err| {
            CliError::invalid_input(format!(
                "Expected a JSON array of line items or {{ \"items\": [...] }}: {}",
                err
            ))
        })?;

        Ok(match shape {
            RequestShape::Items(items) => QuoteRequest {
                items,
                margin_override: None,
            },
            RequestShape::Request(request) => request,
        })
    }

    /// Coerces the raw items into engine inputs.
    pub fn line_items(&self) -> Vec<LineItemInput> {
        self.items.iter().map(LineItemInput::from_raw).collect()
    }
}

/// The quote document handed to the proposal renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDocument {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub line_items: Vec<Quote>,
    pub aggregate: AggregateQuote,
}

impl QuoteDocument {
    /// Wraps a priced quote with a fresh id and timestamp.
    pub fn new(priced: PricedQuote) -> Self {
        QuoteDocument {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            line_items: priced.line_items,
            aggregate: priced.aggregate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::{Environment, ProductClass};

    #[test]
    fn test_object_shape() {
        let request = QuoteRequest::from_json(
            r#"{ "marginOverride": 35, "items": [ { "width": "10 ft", "height": 5 } ] }"#,
        )
        .unwrap();

        assert_eq!(request.margin_override, Some(35.0));
        let inputs = request.line_items();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].width_ft, 10.0);
        assert_eq!(inputs[0].height_ft, 5.0);
    }

    #[test]
    fn test_bare_array_shape() {
        let request = QuoteRequest::from_json(
            r#"[ { "width": 80, "height": 3, "productType": "Ribbon", "environment": "OUTDOOR" } ]"#,
        )
        .unwrap();

        assert_eq!(request.margin_override, None);
        let input = &request.line_items()[0];
        assert_eq!(input.product_class, ProductClass::Ribbon);
        assert_eq!(input.environment, Environment::Outdoor);
    }

    #[test]
    fn test_line_items_alias() {
        let request = QuoteRequest::from_json(r#"{ "lineItems": [ {}, {} ] }"#).unwrap();
        assert_eq!(request.items.len(), 2);
    }

    #[test]
    fn test_not_a_request() {
        let err = QuoteRequest::from_json(r#""ten screens""#).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::InvalidInput);
    }
}
