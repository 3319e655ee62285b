//! # Check Command
//!
//! Validates `characters.json` against `houses.json` and prints a report.
//! The exit code is 0 when no errors were found, 1 when at least one error
//! was found, and 2 when either file could not be read or parsed.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use roster_check::validate_files;

use crate::report::{render_json, render_text};

/// Report output format.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// One line per issue, then a summary.
    #[default]
    Text,
    /// A single JSON object.
    Json,
}

/// Arguments for a validation run.
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Path to characters.json.
    #[arg(long, value_name = "PATH", default_value = "config/characters.json")]
    pub characters: PathBuf,

    /// Path to houses.json.
    #[arg(long, value_name = "PATH", default_value = "config/houses.json")]
    pub houses: PathBuf,

    /// Report format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Run validation and write the report to `out`. Returns the exit code.
pub fn run_check(args: &CheckArgs, out: &mut impl Write) -> Result<u8> {
    tracing::info!(
        characters = %args.characters.display(),
        houses = %args.houses.display(),
        "validating rosters"
    );

    let outcome = validate_files(&args.characters, &args.houses);
    let rendered = match args.format {
        ReportFormat::Text => render_text(&outcome, out),
        ReportFormat::Json => render_json(&outcome, out),
    };
    rendered.context("failed to write report")?;

    Ok(outcome.status.exit_code())
}
