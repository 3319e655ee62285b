//! # roster CLI entry point
//!
//! Parses command-line arguments, sets up logging, and runs the check.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use roster_cli::check::{run_check, CheckArgs};

/// Validate a character roster against a house roster.
///
/// Exit codes: 0 = no errors, 1 = errors found, 2 = input could not be
/// read or parsed.
#[derive(Parser, Debug)]
#[command(name = "roster", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    check: CheckArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let stdout = std::io::stdout();
    match run_check(&cli.check, &mut stdout.lock()) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
