//! # Report Rendering
//!
//! Renders a [`ValidationOutcome`] as the line-oriented text report or as a
//! single JSON object. Issues arrive already sorted.

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use roster_check::{RunStatus, ValidationOutcome};
use roster_core::Issue;

/// Requirements that are subjective and never checked automatically.
pub const NOT_VALIDATED: [&str; 3] = [
    "3.1 recurring themes across many NPCs",
    "3.2 cultural voice corresponds to accent language",
    "3.3 / 3.3.1 no aggression / no passive aggressiveness",
];

/// Write the text report.
///
/// A fatal run prints only the issues gathered before the abort.
pub fn render_text(outcome: &ValidationOutcome, out: &mut impl Write) -> Result<()> {
    for issue in &outcome.issues {
        writeln!(out, "{issue}")?;
    }
    if outcome.status == RunStatus::Fatal {
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "Summary:")?;
    writeln!(out, "- Errors: {}", outcome.error_count())?;
    writeln!(out, "- Warnings: {}", outcome.warning_count())?;

    writeln!(out)?;
    writeln!(
        out,
        "Not automatically validated (subjective / non-objective requirements):"
    )?;
    for item in NOT_VALIDATED {
        writeln!(out, "- {item}")?;
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    issues: &'a [Issue],
    errors: usize,
    warnings: usize,
    status: &'static str,
    not_validated: [&'static str; 3],
}

/// Write the JSON report followed by a newline.
pub fn render_json(outcome: &ValidationOutcome, out: &mut impl Write) -> Result<()> {
    let report = JsonReport {
        issues: &outcome.issues,
        errors: outcome.error_count(),
        warnings: outcome.warning_count(),
        status: outcome.status.as_str(),
        not_validated: NOT_VALIDATED,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}
