//! # Issues and the Issue Sink
//!
//! Every validator appends [`Issue`]s to an [`IssueSink`]. The sink never
//! drops or rewrites an entry; callers merge sinks and keep going.
//!
//! ## Ordering
//!
//! The derived ordering on [`Issue`] is the report order: severity first
//! (errors before warnings), then the requirement identifier compared as a
//! plain string (so `"2.10"` sorts before `"2.2"`), then the message text.
//! Field declaration order below is what makes the derive correct.

use std::fmt;

use serde::Serialize;

/// Issue severity. Only [`Severity::Error`] affects the exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Severity {
    /// Violation of an objective requirement.
    #[serde(rename = "ERROR")]
    Error,
    /// Technically valid but suspicious content.
    #[serde(rename = "WARN")]
    Warning,
}

impl Severity {
    /// Label used in rendered reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Issue {
    /// Error or warning.
    pub severity: Severity,
    /// Requirement identifier, e.g. `"2.3.6.4.3"`.
    pub requirement: &'static str,
    /// Human-readable description.
    pub message: String,
}

impl Issue {
    /// Create an error-level issue.
    pub fn error(requirement: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            requirement,
            message: message.into(),
        }
    }

    /// Create a warning-level issue.
    pub fn warning(requirement: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            requirement,
            message: message.into(),
        }
    }

    /// Returns true for error-level issues.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [Req {}] {}", self.severity, self.requirement, self.message)
    }
}

/// Append-only collection of issues for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueSink {
    issues: Vec<Issue>,
}

impl IssueSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error.
    pub fn error(&mut self, requirement: &'static str, message: impl Into<String>) {
        self.issues.push(Issue::error(requirement, message));
    }

    /// Record a warning.
    pub fn warning(&mut self, requirement: &'static str, message: impl Into<String>) {
        self.issues.push(Issue::warning(requirement, message));
    }

    /// Merge another sink's issues after this one's.
    pub fn absorb(&mut self, other: IssueSink) {
        self.issues.extend(other.issues);
    }

    /// Number of recorded issues.
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues in insertion order.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Number of error-level issues.
    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|i| i.is_error()).count()
    }

    /// Number of warning-level issues.
    pub fn warning_count(&self) -> usize {
        self.issues.len() - self.error_count()
    }

    /// Returns true if any error-level issue was recorded.
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(Issue::is_error)
    }

    /// Consume the sink and return its issues in report order.
    pub fn into_sorted(self) -> Vec<Issue> {
        let mut issues = self.issues;
        issues.sort();
        issues
    }
}

impl Extend<Issue> for IssueSink {
    fn extend<T: IntoIterator<Item = Issue>>(&mut self, iter: T) {
        self.issues.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_report_line_format() {
        let issue = Issue::error("2.3", "houses.json: expected 30 houses, found 29.");
        assert_eq!(
            issue.to_string(),
            "ERROR [Req 2.3] houses.json: expected 30 houses, found 29."
        );
        let warn = Issue::warning("3.4", "Even side: all house zsize values are identical (13).");
        assert!(warn.to_string().starts_with("WARN [Req 3.4] "));
    }

    #[test]
    fn errors_sort_before_warnings() {
        let mut sink = IssueSink::new();
        sink.warning("1.0", "a");
        sink.error("9.9", "z");
        let sorted = sink.into_sorted();
        assert_eq!(sorted[0].severity, Severity::Error);
        assert_eq!(sorted[1].severity, Severity::Warning);
    }

    #[test]
    fn requirement_ids_sort_as_strings() {
        let mut sink = IssueSink::new();
        sink.error("2.2", "b");
        sink.error("2.10", "a");
        let sorted = sink.into_sorted();
        assert_eq!(sorted[0].requirement, "2.10");
        assert_eq!(sorted[1].requirement, "2.2");
    }

    #[test]
    fn message_is_the_tiebreaker() {
        let mut sink = IssueSink::new();
        sink.error("2.8", "NPC id=9 does not appear in any house occupants list.");
        sink.error("2.8", "NPC id=10 does not appear in any house occupants list.");
        let sorted = sink.into_sorted();
        assert!(sorted[0].message.starts_with("NPC id=10"));
    }

    #[test]
    fn counts_and_absorb() {
        let mut a = IssueSink::new();
        a.error("2.3", "x");
        let mut b = IssueSink::new();
        b.warning("3.4", "y");
        b.warning("2.2.9", "z");
        a.absorb(b);
        assert_eq!(a.len(), 3);
        assert_eq!(a.error_count(), 1);
        assert_eq!(a.warning_count(), 2);
        assert!(a.has_errors());
    }

    #[test]
    fn warnings_alone_are_not_errors() {
        let mut sink = IssueSink::new();
        sink.warning("2.2.10", "dup");
        assert!(!sink.has_errors());
        assert!(!sink.is_empty());
    }

    #[test]
    fn severity_serializes_as_report_label() {
        let issue = Issue::warning("3.4", "m");
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["severity"], "WARN");
        assert_eq!(json["requirement"], "3.4");
    }
}
