//! # Command Handlers
//!
//! Each handler returns the text for stdout; `run` does the printing.

use std::io::Read;
use std::path::Path;

use lumen_core::{price_line_items, AggregateOptions};
use lumen_rules::{load, load_file, to_toml};
use tracing::{debug, info};

use crate::cli::{QuoteArgs, RulesSource};
use crate::document::{QuoteDocument, QuoteRequest};
use crate::error::{CliError, CliResult, ErrorCode};

/// `lumen quote`: prices the input file and renders the quote document.
pub fn quote(args: &QuoteArgs) -> CliResult<String> {
    let rules = load(args.source.rules.clone())?;
    let request = QuoteRequest::from_json(&read_input(&args.input)?)?;

    let inputs = request.line_items();
    if inputs.is_empty() {
        return Err(CliError::new(ErrorCode::EmptyQuote, "Input contains no line items")
            .with_field("items"));
    }

    let options = AggregateOptions {
        margin_override: args.margin_override.or(request.margin_override),
    };
    let priced = price_line_items(&inputs, &rules, &options)?;

    info!(
        lines = priced.line_items.len(),
        sell_price = %priced.aggregate.sell_price,
        "Quote priced"
    );

    let document = QuoteDocument::new(priced);
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    Ok(rendered)
}

/// `lumen rules show`: the effective table after file and environment.
pub fn rules_show(source: &RulesSource) -> CliResult<String> {
    let rules = load(source.rules.clone())?;
    Ok(to_toml(&rules)?)
}

/// `lumen rules check FILE`: validates one file as written.
pub fn rules_check(file: &Path) -> CliResult<String> {
    load_file(file)?;
    Ok(format!("{}: ok", file.display()))
}

fn read_input(path: &Path) -> CliResult<String> {
    if path == Path::new("-") {
        debug!("Reading line items from stdin");
        let mut contents = String::new();
        std::io::stdin().read_to_string(&mut contents)?;
        return Ok(contents);
    }

    std::fs::read_to_string(path).map_err(|err| {
        CliError::new(
            ErrorCode::IoError,
            format!("Failed to read {}: {}", path.display(), err),
        )
        .with_field("input")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    struct Fixture {
        _dir: tempfile::TempDir,
        input: PathBuf,
        rules: PathBuf,
    }

    fn fixture(items: &str, rules: &str) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("items.json");
        let rules_path = dir.path().join("rules.toml");
        fs::write(&input, items).unwrap();
        fs::write(&rules_path, rules).unwrap();
        Fixture {
            _dir: dir,
            input,
            rules: rules_path,
        }
    }

    fn quote_args(fixture: &Fixture, margin_override: Option<f64>) -> QuoteArgs {
        QuoteArgs {
            input: fixture.input.clone(),
            source: RulesSource {
                rules: Some(fixture.rules.clone()),
            },
            margin_override,
            pretty: false,
        }
    }

    #[test]
    fn test_quote_renders_document() {
        let fixture = fixture(
            r#"[ { "label": "Lobby", "width": "10 ft", "height": 5, "margin": "30%" } ]"#,
            "",
        );

        let output = quote(&quote_args(&fixture, None)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert!(json["id"].is_string());
        assert!(json["generatedAt"].is_string());
        assert_eq!(json["lineItems"][0]["label"], "Lobby");
        assert_eq!(json["lineItems"][0]["totalInternalCost"], 57_200);
        assert_eq!(json["aggregate"]["sellPrice"], 81_714);
        assert_eq!(json["aggregate"]["marginPercent"], 30.0);
    }

    #[test]
    fn test_flag_override_beats_file_override() {
        let fixture = fixture(
            r#"{ "marginOverride": 25, "items": [ { "width": 10, "height": 5 } ] }"#,
            "",
        );

        let output = quote(&quote_args(&fixture, Some(40.0))).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["aggregate"]["marginPercent"], 40.0);
    }

    #[test]
    fn test_failing_item_reports_index() {
        let fixture = fixture(
            r#"[ { "width": 10, "height": 5 }, { "width": 10, "height": 5, "margin": 100 } ]"#,
            "",
        );

        let err = quote(&quote_args(&fixture, None)).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidMargin);
        assert_eq!(err.field.as_deref(), Some("items[1].targetMarginPercent"));
    }

    #[test]
    fn test_huge_item_is_rejected_with_its_index() {
        let fixture = fixture(
            r#"[ { "width": 10, "height": 5 }, { "width": 1e8, "height": 1e8 } ]"#,
            "",
        );

        let err = quote(&quote_args(&fixture, None)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.field.as_deref(), Some("items[1].screenArea"));
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let fixture = fixture("[]", "");
        let err = quote(&quote_args(&fixture, None)).unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyQuote);
    }

    #[test]
    fn test_rules_file_is_applied() {
        let fixture = fixture(
            r#"[ { "width": 10, "height": 5 } ]"#,
            "[hardware]\nstandard_rate = 1000.0\n",
        );

        let output = quote(&quote_args(&fixture, None)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["lineItems"][0]["breakdown"]["hardware"]["internal"], 50_000);
    }

    #[test]
    fn test_missing_input_file() {
        let fixture = fixture("[]", "");
        let mut args = quote_args(&fixture, None);
        args.input = fixture.input.with_file_name("missing.json");

        let err = quote(&args).unwrap_err();
        assert_eq!(err.code, ErrorCode::IoError);
        assert_eq!(err.field.as_deref(), Some("input"));
    }

    #[test]
    fn test_rules_check() {
        let good = fixture("[]", "[fees]\nbond_rate = 0.02\n");
        assert!(rules_check(&good.rules).unwrap().ends_with(": ok"));

        let bad = fixture("[]", "[fees]\nbond_rate = -0.02\n");
        let err = rules_check(&bad.rules).unwrap_err();
        assert_eq!(err.code, ErrorCode::RulesError);
        assert_eq!(err.field.as_deref(), Some("rules.fees.bond_rate"));
    }

    #[test]
    fn test_rules_show_renders_toml() {
        let fixture = fixture("[]", "[labor]\nunion = 0.25\n");
        let text = rules_show(&RulesSource {
            rules: Some(fixture.rules.clone()),
        })
        .unwrap();

        assert!(text.contains("[labor]"));
        assert!(text.contains("union = 0.25"));
    }
}
