//! # Error Hierarchy
//!
//! Fatal input errors, built with `thiserror`. These are the only failures
//! that stop a run: an unreadable file, text that is not UTF-8, or text that
//! is not well-formed JSON. Everything past parsing is reported as an
//! [`Issue`](crate::Issue) instead.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or parsing an input file.
#[derive(Error, Debug)]
pub enum RosterError {
    /// The input file does not exist.
    #[error("{path}: file not found.")]
    NotFound {
        /// Path that was requested.
        path: PathBuf,
    },

    /// The input file exists but could not be read.
    #[error("{path}: file could not be read ({source}).")]
    Io {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The file contents are not strict UTF-8.
    #[error("{path}: file is not valid UTF-8 ({source}).")]
    InvalidUtf8 {
        /// Path of the offending file.
        path: PathBuf,
        /// Decoder failure, including the offending byte offset.
        source: std::string::FromUtf8Error,
    },

    /// The text is not well-formed JSON.
    #[error("{path}: invalid JSON (line {line}, col {column}): {message}")]
    JsonSyntax {
        /// Path of the offending file.
        path: PathBuf,
        /// 1-based line of the syntax error.
        line: usize,
        /// 1-based column of the syntax error.
        column: usize,
        /// Parser description without the position suffix.
        message: String,
    },
}

impl RosterError {
    /// Requirement identifier this failure is reported under.
    pub fn requirement(&self) -> &'static str {
        match self {
            RosterError::NotFound { .. } | RosterError::Io { .. } => "1.1/2.x",
            RosterError::InvalidUtf8 { .. } => "1.4.1",
            RosterError::JsonSyntax { .. } => "1.2",
        }
    }

    /// Build a [`RosterError::JsonSyntax`] from a `serde_json` failure.
    ///
    /// `serde_json` appends " at line L column C" to its messages; the
    /// position is carried in dedicated fields instead.
    pub fn json_syntax(path: impl Into<PathBuf>, err: &serde_json::Error) -> Self {
        let rendered = err.to_string();
        let message = match rendered.rsplit_once(" at line ") {
            Some((head, _)) => head.to_string(),
            None => rendered,
        };
        RosterError::JsonSyntax {
            path: path.into(),
            line: err.line(),
            column: err.column(),
            message,
        }
    }
}
