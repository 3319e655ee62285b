//! # Validation Pipeline
//!
//! Orchestrates one run: load and scan both files, parse both, validate the
//! two rosters independently, derive the relationship indexes, then run the
//! cross-file checks. All issues land in one sink and are sorted once.
//!
//! A run aborts early at exactly two points. If either file cannot be
//! loaded, or either file cannot be parsed, the run is fatal; both files
//! are still attempted at each stage before aborting.

use std::path::Path;

use serde_json::Value;

use roster_core::{Issue, IssueSink, RosterError};

use crate::characters::validate_characters;
use crate::consistency::check_consistency;
use crate::houses::validate_houses;
use crate::input::{load_text, parse_json, scan_disallowed_glyphs};
use crate::relationships::build_relationships;

/// Overall result of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Both files parsed and no error-level issue was found.
    Pass,
    /// Both files parsed and at least one error-level issue was found.
    Fail,
    /// A file could not be read, decoded, or parsed.
    Fatal,
}

impl RunStatus {
    /// Process exit code for this status.
    pub fn exit_code(self) -> u8 {
        match self {
            RunStatus::Pass => 0,
            RunStatus::Fail => 1,
            RunStatus::Fatal => 2,
        }
    }

    /// Lowercase label used in machine-readable reports.
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Pass => "pass",
            RunStatus::Fail => "fail",
            RunStatus::Fatal => "fatal",
        }
    }
}

/// Sorted issues plus the run status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    /// Every issue in report order.
    pub issues: Vec<Issue>,
    /// Pass, fail, or fatal.
    pub status: RunStatus,
}

impl ValidationOutcome {
    fn finish(sink: IssueSink, fatal: bool) -> Self {
        let status = if fatal {
            RunStatus::Fatal
        } else if sink.has_errors() {
            RunStatus::Fail
        } else {
            RunStatus::Pass
        };
        ValidationOutcome {
            issues: sink.into_sorted(),
            status,
        }
    }

    /// Number of error-level issues.
    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|i| i.is_error()).count()
    }

    /// Number of warning-level issues.
    pub fn warning_count(&self) -> usize {
        self.issues.len() - self.error_count()
    }
}

/// Validate two parsed documents. Never fails; every finding is an issue.
pub fn validate_documents(characters: &Value, houses: &Value) -> IssueSink {
    let mut sink = IssueSink::new();

    let (houses_by_number, house_issues) = validate_houses(houses);
    sink.absorb(house_issues);

    let (chars_by_id, character_issues) = validate_characters(characters);
    sink.absorb(character_issues);

    let (links, relationship_issues) = build_relationships(&chars_by_id);
    sink.absorb(relationship_issues);

    sink.absorb(check_consistency(&chars_by_id, &houses_by_number, &links));
    sink
}

/// Load, parse, and validate both roster files.
pub fn validate_files(characters_path: &Path, houses_path: &Path) -> ValidationOutcome {
    let mut sink = IssueSink::new();

    let characters_text = load_scanned(characters_path, &mut sink);
    let houses_text = load_scanned(houses_path, &mut sink);
    let (Some(characters_text), Some(houses_text)) = (characters_text, houses_text) else {
        tracing::warn!("input could not be loaded; aborting run");
        return ValidationOutcome::finish(sink, true);
    };

    let characters = parse_or_report(characters_path, &characters_text, &mut sink);
    let houses = parse_or_report(houses_path, &houses_text, &mut sink);
    let (Some(characters), Some(houses)) = (characters, houses) else {
        tracing::warn!("input is not valid JSON; aborting run");
        return ValidationOutcome::finish(sink, true);
    };

    sink.absorb(validate_documents(&characters, &houses));
    tracing::info!(
        errors = sink.error_count(),
        warnings = sink.warning_count(),
        "validation complete"
    );
    ValidationOutcome::finish(sink, false)
}

fn report_fatal(err: RosterError, sink: &mut IssueSink) {
    tracing::debug!(error = %err, "fatal input failure");
    sink.error(err.requirement(), err.to_string());
}

fn load_scanned(path: &Path, sink: &mut IssueSink) -> Option<String> {
    match load_text(path) {
        Ok(text) => {
            sink.absorb(scan_disallowed_glyphs(path, &text));
            Some(text)
        }
        Err(err) => {
            report_fatal(err, sink);
            None
        }
    }
}

fn parse_or_report(path: &Path, text: &str, sink: &mut IssueSink) -> Option<Value> {
    parse_json(path, text)
        .map_err(|err| report_fatal(err, sink))
        .ok()
}
