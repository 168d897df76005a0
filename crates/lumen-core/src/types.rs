//! # Domain Types
//!
//! Inputs and outputs of the quote engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  RawLineItem    │   │ LineItemInput   │   │     Quote       │       │
//! │  │  ─────────────  │──►│  ─────────────  │──►│  ─────────────  │       │
//! │  │  JSON values    │   │  width/height   │   │  breakdown      │       │
//! │  │  free text      │   │  typed enums    │   │  sellPrice      │       │
//! │  └─────────────────┘   │  margin         │   │  powerAmps      │       │
//! │      form / agent      └─────────────────┘   └────────┬────────┘       │
//! │                                                        │ N quotes       │
//! │                                              ┌─────────▼────────┐       │
//! │                                              │  AggregateQuote  │       │
//! │                                              └──────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lenient Categories
//! Every categorical input parses case-insensitively with a few aliases, and
//! anything unrecognized maps to the base variant (no surcharge). Parsing a
//! category never fails.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use ts_rs::TS;

use crate::money::Money;
use crate::parse::{parse_flag, parse_numeric_value, parse_optional_numeric};

/// Lowercases and drops separators so "Prevailing-Wage" matches "prevailingwage".
fn normalize_category(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .collect()
}

/// `From<String>`, `From<&str>` and `Display` for a lenient category enum.
macro_rules! lenient_category {
    ($name:ident) => {
        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                $name::parse_lenient(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                $name::parse_lenient(&value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

// =============================================================================
// Categorical Inputs
// =============================================================================

/// Display product class; selects the hardware base rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case", from = "String")]
#[ts(export)]
pub enum ProductClass {
    #[default]
    Standard,
    /// Long, narrow fascia displays.
    Ribbon,
    Scoreboard,
}

impl ProductClass {
    pub fn parse_lenient(value: &str) -> Self {
        match normalize_category(value).as_str() {
            "ribbon" | "ribbonboard" | "fascia" => ProductClass::Ribbon,
            "scoreboard" | "score" => ProductClass::Scoreboard,
            _ => ProductClass::Standard,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductClass::Standard => "standard",
            ProductClass::Ribbon => "ribbon",
            ProductClass::Scoreboard => "scoreboard",
        }
    }
}

lenient_category!(ProductClass);

/// Install environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case", from = "String")]
#[ts(export)]
pub enum Environment {
    #[default]
    Indoor,
    Outdoor,
}

impl Environment {
    pub fn parse_lenient(value: &str) -> Self {
        match normalize_category(value).as_str() {
            "outdoor" | "outside" | "exterior" => Environment::Outdoor,
            _ => Environment::Indoor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Indoor => "indoor",
            Environment::Outdoor => "outdoor",
        }
    }

    pub fn is_outdoor(&self) -> bool {
        matches!(self, Environment::Outdoor)
    }
}

lenient_category!(Environment);

/// Whether the supporting structure already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case", from = "String")]
#[ts(export)]
pub enum StructureStatus {
    #[default]
    Existing,
    New,
}

impl StructureStatus {
    pub fn parse_lenient(value: &str) -> Self {
        match normalize_category(value).as_str() {
            "new" | "newstructure" | "newbuild" => StructureStatus::New,
            _ => StructureStatus::Existing,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StructureStatus::Existing => "existing",
            StructureStatus::New => "new",
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, StructureStatus::New)
    }
}

lenient_category!(StructureStatus);

/// How the display is hung.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case", from = "String")]
#[ts(export)]
pub enum MountingType {
    #[default]
    Standard,
    Rigging,
}

impl MountingType {
    pub fn parse_lenient(value: &str) -> Self {
        match normalize_category(value).as_str() {
            "rigging" | "rigged" | "flown" | "hung" => MountingType::Rigging,
            _ => MountingType::Standard,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MountingType::Standard => "standard",
            MountingType::Rigging => "rigging",
        }
    }
}

lenient_category!(MountingType);

/// Face geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case", from = "String")]
#[ts(export)]
pub enum Shape {
    #[default]
    Flat,
    Curved,
}

impl Shape {
    pub fn parse_lenient(value: &str) -> Self {
        match normalize_category(value).as_str() {
            "curved" | "curve" | "concave" | "convex" => Shape::Curved,
            _ => Shape::Flat,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Flat => "flat",
            Shape::Curved => "curved",
        }
    }
}

lenient_category!(Shape);

/// Labor rules that apply at the install site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case", from = "String")]
#[ts(export)]
pub enum LaborJurisdiction {
    #[default]
    Standard,
    Union,
    Prevailing,
}

impl LaborJurisdiction {
    pub fn parse_lenient(value: &str) -> Self {
        match normalize_category(value).as_str() {
            "union" | "unionlabor" => LaborJurisdiction::Union,
            "prevailing" | "prevailingwage" => LaborJurisdiction::Prevailing,
            _ => LaborJurisdiction::Standard,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LaborJurisdiction::Standard => "standard",
            LaborJurisdiction::Union => "union",
            LaborJurisdiction::Prevailing => "prevailing",
        }
    }
}

lenient_category!(LaborJurisdiction);

/// Service access to the cabinets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case", from = "String")]
#[ts(export)]
pub enum Access {
    #[default]
    Standard,
    Rear,
}

impl Access {
    pub fn parse_lenient(value: &str) -> Self {
        match normalize_category(value).as_str() {
            "rear" | "rearaccess" | "back" => Access::Rear,
            _ => Access::Standard,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Access::Standard => "standard",
            Access::Rear => "rear",
        }
    }
}

lenient_category!(Access);

// =============================================================================
// Line Item Input
// =============================================================================

/// One priced unit, typically one display screen.
///
/// Missing JSON fields take their [`Default`] values; a missing margin uses
/// the rule set's default margin.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct LineItemInput {
    /// Free-text name carried through to the quote ("Main Scoreboard").
    pub label: Option<String>,
    /// Width in feet.
    pub width_ft: f64,
    /// Height in feet.
    pub height_ft: f64,
    pub product_class: ProductClass,
    /// LED pixel pitch in millimetres.
    pub pixel_pitch_mm: Option<f64>,
    pub environment: Environment,
    pub structure_status: StructureStatus,
    pub mounting_type: MountingType,
    pub shape: Shape,
    pub labor_jurisdiction: LaborJurisdiction,
    pub access: Access,
    pub bond_required: bool,
    /// Target margin in percent, `[0, 100)`.
    pub target_margin_percent: Option<f64>,
}

impl LineItemInput {
    /// Creates a base-case item of the given size.
    pub fn new(width_ft: f64, height_ft: f64) -> Self {
        LineItemInput {
            width_ft,
            height_ft,
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_product_class(mut self, class: ProductClass) -> Self {
        self.product_class = class;
        self
    }

    pub fn with_pixel_pitch(mut self, pitch_mm: f64) -> Self {
        self.pixel_pitch_mm = Some(pitch_mm);
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_structure_status(mut self, status: StructureStatus) -> Self {
        self.structure_status = status;
        self
    }

    pub fn with_mounting_type(mut self, mounting: MountingType) -> Self {
        self.mounting_type = mounting;
        self
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_labor_jurisdiction(mut self, labor: LaborJurisdiction) -> Self {
        self.labor_jurisdiction = labor;
        self
    }

    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    pub fn with_bond_required(mut self, required: bool) -> Self {
        self.bond_required = required;
        self
    }

    pub fn with_margin(mut self, margin_percent: f64) -> Self {
        self.target_margin_percent = Some(margin_percent);
        self
    }

    /// Converts loosely-typed form or agent input.
    ///
    /// ## Coercion Rules
    /// - width/height: numeric or numeric text, anything else becomes `0`
    ///   (range problems are reported later as warnings)
    /// - pixel pitch: absent or unparseable stays absent
    /// - margin: null means "use the default"; present but unparseable
    ///   becomes NaN so pricing rejects it instead of quietly using 30%
    /// - categories: lenient parsing, unknown maps to the base case
    pub fn from_raw(raw: &RawLineItem) -> Self {
        let category = |value: &Option<String>| value.as_deref().unwrap_or_default().to_string();

        let target_margin_percent = match &raw.target_margin_percent {
            Value::Null => None,
            Value::String(text) if text.trim().is_empty() => None,
            value => Some(parse_numeric_value(value, f64::NAN)),
        };

        LineItemInput {
            label: raw.label.clone().filter(|label| !label.trim().is_empty()),
            width_ft: parse_numeric_value(&raw.width, 0.0),
            height_ft: parse_numeric_value(&raw.height, 0.0),
            product_class: ProductClass::from(category(&raw.product_class)),
            pixel_pitch_mm: parse_optional_numeric(&raw.pixel_pitch),
            environment: Environment::from(category(&raw.environment)),
            structure_status: StructureStatus::from(category(&raw.structure_status)),
            mounting_type: MountingType::from(category(&raw.mounting_type)),
            shape: Shape::from(category(&raw.shape)),
            labor_jurisdiction: LaborJurisdiction::from(category(&raw.labor_jurisdiction)),
            access: Access::from(category(&raw.access)),
            bond_required: parse_flag(&raw.bond_required, false),
            target_margin_percent,
        }
    }
}

/// Line item fields as a form or AI agent hands them over.
///
/// Numbers may arrive as JSON numbers or as text ("12 ft", "30%"); every
/// field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawLineItem {
    pub label: Option<String>,
    pub width: Value,
    pub height: Value,
    #[serde(alias = "productType")]
    pub product_class: Option<String>,
    pub pixel_pitch: Value,
    pub environment: Option<String>,
    pub structure_status: Option<String>,
    pub mounting_type: Option<String>,
    pub shape: Option<String>,
    #[serde(alias = "laborType")]
    pub labor_jurisdiction: Option<String>,
    pub access: Option<String>,
    pub bond_required: Value,
    #[serde(alias = "margin", alias = "marginPercent")]
    pub target_margin_percent: Value,
}

// =============================================================================
// Cost Breakdown
// =============================================================================

/// A named cost bucket.
///
/// Declaration order is the canonical order: breakdown maps are keyed by this
/// enum in a `BTreeMap`, so output always lists hardware first and bond last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CostCategory {
    Hardware,
    Structural,
    Labor,
    /// Shipping and other pass-through expenses.
    Expense,
    /// Risk buffer for new-structure outdoor installs.
    Contingency,
    /// Performance bond.
    Bond,
}

impl CostCategory {
    /// All categories in canonical order.
    pub const ALL: [CostCategory; 6] = [
        CostCategory::Hardware,
        CostCategory::Structural,
        CostCategory::Labor,
        CostCategory::Expense,
        CostCategory::Contingency,
        CostCategory::Bond,
    ];

    /// Categories whose sell price is `internal * markup`.
    pub const MARKED_UP: [CostCategory; 4] = [
        CostCategory::Hardware,
        CostCategory::Structural,
        CostCategory::Labor,
        CostCategory::Expense,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CostCategory::Hardware => "hardware",
            CostCategory::Structural => "structural",
            CostCategory::Labor => "labor",
            CostCategory::Expense => "expense",
            CostCategory::Contingency => "contingency",
            CostCategory::Bond => "bond",
        }
    }
}

impl fmt::Display for CostCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rounded internal cost and sell price of one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CategoryAmount {
    pub internal: Money,
    pub sell: Money,
}

/// Category name to rounded amounts, in canonical category order.
pub type CostBreakdown = BTreeMap<CostCategory, CategoryAmount>;

// =============================================================================
// Warnings
// =============================================================================

/// Something in the input was normalized rather than rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "camelCase")]
#[ts(export)]
pub enum QuoteWarning {
    /// A negative or non-finite dimension was priced as zero.
    #[serde(rename_all = "camelCase")]
    InvalidDimension { field: String, value: String },
    /// A non-positive or non-finite pixel pitch was treated as absent.
    #[serde(rename_all = "camelCase")]
    IgnoredPixelPitch { value: String },
}

impl fmt::Display for QuoteWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteWarning::InvalidDimension { field, value } => {
                write!(f, "{} '{}' is not a valid dimension; priced as 0", field, value)
            }
            QuoteWarning::IgnoredPixelPitch { value } => {
                write!(f, "pixel pitch '{}' ignored; no fine-pitch premium applied", value)
            }
        }
    }
}

/// A warning from one line item of an aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItemWarning {
    pub index: usize,
    pub warning: QuoteWarning,
}

// =============================================================================
// Unit Tests
// =============================================================================
