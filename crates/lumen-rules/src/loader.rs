//! # Rules Loader
//!
//! Builds a validated [`RuleSet`] from defaults, a TOML file and environment
//! overrides.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     LUMEN_DEFAULT_MARGIN=32                                             │
//! │     LUMEN_SHIPPING_RATE=0.06      (or "6%")                             │
//! │     LUMEN_BOND_RATE, LUMEN_CONTINGENCY_RATE                             │
//! │                                                                         │
//! │  2. TOML Rules File                                                     │
//! │     --rules FILE, else LUMEN_RULES_PATH, else                           │
//! │     ~/.config/lumen/rules.toml (Linux)                                  │
//! │     ~/Library/Application Support/com.lumen.lumen/rules.toml (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! │     RuleSet::default(): the standard pricing sheet                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A file named explicitly (flag or `LUMEN_RULES_PATH`) must exist. The
//! platform file is optional.

use std::path::{Path, PathBuf};

use lumen_core::parse::parse_numeric_input;
use lumen_core::validation::{margin_fraction, validate_rate};
use lumen_core::RuleSet;
use tracing::{debug, info, warn};

use crate::error::{RulesError, RulesResult};

/// Environment variable naming the rules file.
pub const RULES_PATH_ENV: &str = "LUMEN_RULES_PATH";
/// Overrides `fees.default_margin_percent`.
pub const DEFAULT_MARGIN_ENV: &str = "LUMEN_DEFAULT_MARGIN";
/// Overrides `fees.shipping_rate`.
pub const SHIPPING_RATE_ENV: &str = "LUMEN_SHIPPING_RATE";
/// Overrides `fees.bond_rate`.
pub const BOND_RATE_ENV: &str = "LUMEN_BOND_RATE";
/// Overrides `fees.contingency_rate`.
pub const CONTINGENCY_RATE_ENV: &str = "LUMEN_CONTINGENCY_RATE";

/// File name inside the platform config directory.
pub const RULES_FILE_NAME: &str = "rules.toml";

/// Where the table comes from.
#[derive(Debug, Clone, PartialEq)]
enum RulesSource {
    /// Named by the caller; must exist.
    Explicit(PathBuf),
    /// Platform config file; optional.
    Platform(PathBuf),
    /// No config directory on this platform.
    Defaults,
}

// =============================================================================
// Loading
// =============================================================================

/// Loads the rate table from file, environment, and defaults.
///
/// ## Load Order (later overrides earlier)
/// 1. Default values
/// 2. Rules file
/// 3. Environment variables
///
/// The result is validated before it is returned.
pub fn load(path: Option<PathBuf>) -> RulesResult<RuleSet> {
    load_with(path, |key| std::env::var(key).ok())
}

/// [`load`] with an injectable variable lookup.
pub fn load_with<F>(path: Option<PathBuf>, lookup: F) -> RulesResult<RuleSet>
where
    F: Fn(&str) -> Option<String>,
{
    let mut rules = match resolve_source(path, &lookup) {
        RulesSource::Explicit(path) => {
            if !path.exists() {
                return Err(RulesError::NotFound(path));
            }
            read_rules_file(&path)?
        }
        RulesSource::Platform(path) if path.exists() => read_rules_file(&path)?,
        RulesSource::Platform(path) => {
            debug!(?path, "Rules file not found, using defaults");
            RuleSet::default()
        }
        RulesSource::Defaults => RuleSet::default(),
    };

    apply_overrides(&mut rules, &lookup);
    validate(&rules)?;

    Ok(rules)
}

/// Loads rules or returns the defaults if loading fails.
pub fn load_or_default(path: Option<PathBuf>) -> RuleSet {
    load(path).unwrap_or_else(|e| {
        warn!("Failed to load rules: {}. Using defaults.", e);
        RuleSet::default()
    })
}

/// Loads and validates exactly one file, ignoring the environment.
pub fn load_file(path: &Path) -> RulesResult<RuleSet> {
    if !path.exists() {
        return Err(RulesError::NotFound(path.to_path_buf()));
    }
    let rules = read_rules_file(path)?;
    validate(&rules)?;
    Ok(rules)
}

/// Parses and validates a TOML table held in memory.
pub fn load_from_str(contents: &str) -> RulesResult<RuleSet> {
    let rules: RuleSet = toml::from_str(contents)?;
    validate(&rules)?;
    Ok(rules)
}

fn read_rules_file(path: &Path) -> RulesResult<RuleSet> {
    info!(?path, "Loading rules from file");
    let contents = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&contents)?)
}

fn resolve_source<F>(path: Option<PathBuf>, lookup: &F) -> RulesSource
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = path {
        return RulesSource::Explicit(path);
    }
    if let Some(path) = lookup(RULES_PATH_ENV).filter(|p| !p.trim().is_empty()) {
        debug!(%path, "Using rules path from environment");
        return RulesSource::Explicit(PathBuf::from(path));
    }
    default_config_path().map_or(RulesSource::Defaults, RulesSource::Platform)
}

/// Returns the platform rules file path.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "lumen", "lumen")
        .map(|dirs| dirs.config_dir().join(RULES_FILE_NAME))
}

// =============================================================================
// Environment Overrides
// =============================================================================

/// Applies `LUMEN_*` overrides read through `lookup`.
///
/// Values go through [`parse_numeric_input`]; a rate written with a percent
/// sign (`"6%"`) is read as a percentage. Non-numeric values are ignored with
/// a warning.
pub fn apply_overrides<F>(rules: &mut RuleSet, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(margin) = read_override(&lookup, DEFAULT_MARGIN_ENV, false) {
        rules.fees.default_margin_percent = margin;
    }
    if let Some(rate) = read_override(&lookup, SHIPPING_RATE_ENV, true) {
        rules.fees.shipping_rate = rate;
    }
    if let Some(rate) = read_override(&lookup, BOND_RATE_ENV, true) {
        rules.fees.bond_rate = rate;
    }
    if let Some(rate) = read_override(&lookup, CONTINGENCY_RATE_ENV, true) {
        rules.fees.contingency_rate = rate;
    }
}

fn read_override<F>(lookup: &F, var: &str, is_rate: bool) -> Option<f64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(var)?;
    let parsed = parse_numeric_input(&raw, f64::NAN);
    if parsed.is_nan() {
        warn!(var, value = %raw, "Ignoring non-numeric override");
        return None;
    }

    let value = if is_rate && raw.trim_end().ends_with('%') {
        parsed / 100.0
    } else {
        parsed
    };
    debug!(var, value, "Overriding rule from environment");
    Some(value)
}

// =============================================================================
// Validation
// =============================================================================

/// Checks that the engine can price with this table.
///
/// - every rate, premium and multiplier finite and non-negative
/// - pitch thresholds and reference voltage greater than 0
/// - default margin in `[0, 100)`
pub fn validate(rules: &RuleSet) -> RulesResult<()> {
    let h = &rules.hardware;
    let s = &rules.structural;
    let l = &rules.labor;
    let f = &rules.fees;
    let p = &rules.power;

    let rates = [
        ("hardware.standard_rate", h.standard_rate),
        ("hardware.ribbon_rate", h.ribbon_rate),
        ("hardware.scoreboard_rate", h.scoreboard_rate),
        ("hardware.fine_pitch_premium", h.fine_pitch_premium),
        ("hardware.ultra_fine_pitch_premium", h.ultra_fine_pitch_premium),
        ("hardware.outdoor_premium", h.outdoor_premium),
        ("structural.base", s.base),
        ("structural.outdoor", s.outdoor),
        ("structural.new_structure", s.new_structure),
        ("structural.rigging", s.rigging),
        ("structural.curved", s.curved),
        ("labor.base", l.base),
        ("labor.union", l.union),
        ("labor.prevailing", l.prevailing),
        ("labor.rear_access", l.rear_access),
        ("fees.shipping_rate", f.shipping_rate),
        ("fees.contingency_rate", f.contingency_rate),
        ("fees.bond_rate", f.bond_rate),
        ("power.indoor_watts_per_sqft", p.indoor_watts_per_sqft),
        ("power.outdoor_watts_per_sqft", p.outdoor_watts_per_sqft),
    ];
    for (field, value) in rates {
        validate_rate(field, value)?;
    }

    let positives = [
        ("hardware.fine_pitch_threshold_mm", h.fine_pitch_threshold_mm),
        ("hardware.ultra_fine_pitch_threshold_mm", h.ultra_fine_pitch_threshold_mm),
        ("power.reference_voltage", p.reference_voltage),
    ];
    for (field, value) in positives {
        if !(value.is_finite() && value > 0.0) {
            return Err(RulesError::InvalidRule {
                field: field.to_string(),
                reason: format!("{} must be greater than 0", value),
            });
        }
    }

    margin_fraction(f.default_margin_percent).map_err(|_| RulesError::InvalidRule {
        field: "fees.default_margin_percent".to_string(),
        reason: format!("{} is outside [0, 100)", f.default_margin_percent),
    })?;

    Ok(())
}

/// Renders the table as TOML.
pub fn to_toml(rules: &RuleSet) -> RulesResult<String> {
    Ok(toml::to_string_pretty(rules)?)
}

// =============================================================================
// Unit Tests
// =============================================================================
