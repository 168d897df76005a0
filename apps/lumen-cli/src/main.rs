//! # Lumen Command-Line Entry Point
//!
//! The actual setup is in lib.rs for testability.

fn main() -> std::process::ExitCode {
    lumen_cli::run()
}
