//! # Command-Line Arguments

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "lumen",
    about = "Price LED display installs from a line item file",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Price every line item in a JSON file and print the quote document
    Quote(QuoteArgs),
    /// Inspect the pricing rule table
    Rules {
        #[command(subcommand)]
        command: RulesCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum RulesCommand {
    /// Print the effective rule table as TOML
    Show(RulesSource),
    /// Validate a rules file without the environment overrides
    Check {
        /// Rules file to validate
        file: PathBuf,
    },
}

#[derive(Args, Debug, Default)]
pub struct RulesSource {
    /// Rules file (defaults to LUMEN_RULES_PATH, then the platform config dir)
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct QuoteArgs {
    /// Line item file: a JSON array of items or `{ "items": [...] }`; `-` reads stdin
    #[arg(long, short, value_name = "FILE")]
    pub input: PathBuf,

    #[command(flatten)]
    pub source: RulesSource,

    /// Margin label for the aggregate; takes precedence over the file's value
    #[arg(long, value_name = "PERCENT")]
    pub margin_override: Option<f64>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}
