//! # lumen-cli: Command-Line Driver
//!
//! ## Application Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          lumen (binary)                                 │
//! │                                                                         │
//! │  main.rs ─────► run()                                                   │
//! │                  │                                                      │
//! │                  ├─ init_tracing()      stderr, RUST_LOG or "info"      │
//! │                  ├─ Cli::parse()        clap derive (cli.rs)            │
//! │                  └─ commands::*         quote / rules show / rules check│
//! │                          │                                              │
//! │             ┌────────────┴────────────┐                                 │
//! │             ▼                         ▼                                 │
//! │        lumen-rules               lumen-core                             │
//! │        (rule table)              (pricing)                              │
//! │                                                                         │
//! │  stdout: quote document JSON, rules TOML, or { code, message, field }   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod document;
pub mod error;

use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, RulesCommand};
use error::CliResult;

/// Runs the CLI and maps the outcome to an exit code.
pub fn run() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    match dispatch(cli.command) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(code = ?err.code, "{}", err.message);
            println!("{}", err.to_json());
            ExitCode::FAILURE
        }
    }
}

fn dispatch(command: Command) -> CliResult<String> {
    match command {
        Command::Quote(args) => commands::quote(&args),
        Command::Rules {
            command: RulesCommand::Show(source),
        } => commands::rules_show(&source),
        Command::Rules {
            command: RulesCommand::Check { file },
        } => commands::rules_check(&file),
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show every costed line item
/// - `RUST_LOG=lumen_core=trace` - Trace the engine only
/// - Default: INFO level
///
/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
