//! # Input Loading
//!
//! Reads a roster file as strict UTF-8, scans the raw text for disallowed
//! typographic quote glyphs, and parses it as JSON. Loading and parsing
//! failures are fatal for the run; glyph findings are ordinary issues.

use std::io::ErrorKind;
use std::path::Path;

use serde_json::Value;

use roster_core::{IssueSink, RosterError};

/// Typographic quotes and primes that must be written as ASCII `'` or `"`.
pub const DISALLOWED_GLYPHS: [char; 7] = [
    '\u{2018}', // left single quotation mark
    '\u{2019}', // right single quotation mark
    '\u{201C}', // left double quotation mark
    '\u{201D}', // right double quotation mark
    '\u{2032}', // prime
    '\u{2033}', // double prime
    '\u{00B4}', // acute accent
];

/// Read a file and decode it as strict UTF-8.
pub fn load_text(path: &Path) -> Result<String, RosterError> {
    let bytes = std::fs::read(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => RosterError::NotFound {
            path: path.to_path_buf(),
        },
        _ => RosterError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    String::from_utf8(bytes).map_err(|source| RosterError::InvalidUtf8 {
        path: path.to_path_buf(),
        source,
    })
}

/// Report every disallowed glyph with its 1-based line and column.
///
/// Columns count characters, not bytes.
pub fn scan_disallowed_glyphs(path: &Path, text: &str) -> IssueSink {
    let mut sink = IssueSink::new();
    let (mut line, mut column) = (1usize, 0usize);
    for ch in text.chars() {
        if ch == '\n' {
            line += 1;
            column = 0;
            continue;
        }
        column += 1;
        if DISALLOWED_GLYPHS.contains(&ch) {
            sink.error(
                "1.4.2",
                format!(
                    "{}: disallowed quote/apostrophe character '{ch}' (U+{:04X}) at line {line}, col {column}. \
                     Use ASCII ' and \" only.",
                    path.display(),
                    u32::from(ch)
                ),
            );
        }
    }
    sink
}

/// Parse decoded text as JSON.
pub fn parse_json(path: &Path, text: &str) -> Result<Value, RosterError> {
    serde_json::from_str(text).map_err(|err| RosterError::json_syntax(path, &err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_text(&dir.path().join("characters.json")).unwrap_err();
        assert!(matches!(err, RosterError::NotFound { .. }));
        assert_eq!(err.requirement(), "1.1/2.x");
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[\"caf\xe9\"]").unwrap();
        let err = load_text(file.path()).unwrap_err();
        assert!(matches!(err, RosterError::InvalidUtf8 { .. }));
        assert_eq!(err.requirement(), "1.4.1");
    }

    #[test]
    fn utf8_text_loads() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all("[\"café\"]".as_bytes()).unwrap();
        assert_eq!(load_text(file.path()).unwrap(), "[\"café\"]");
    }

    #[test]
    fn glyph_position_is_line_and_char_column() {
        let mut text = "\n".repeat(11);
        text.push_str("é \u{2019}x");
        let sink = scan_disallowed_glyphs(Path::new("characters.json"), &text);
        assert_eq!(sink.len(), 1);
        let issue = &sink.issues()[0];
        assert_eq!(issue.requirement, "1.4.2");
        assert_eq!(
            issue.message,
            "characters.json: disallowed quote/apostrophe character '\u{2019}' (U+2019) at line 12, col 3. Use ASCII ' and \" only."
        );
    }

    #[test]
    fn every_glyph_is_reported() {
        let text: String = DISALLOWED_GLYPHS.iter().collect();
        let sink = scan_disallowed_glyphs(Path::new("houses.json"), &text);
        assert_eq!(sink.len(), DISALLOWED_GLYPHS.len());
        assert!(sink.issues()[6].message.contains("col 7"));
    }

    #[test]
    fn ascii_quotes_are_allowed() {
        let sink = scan_disallowed_glyphs(Path::new("x.json"), "[\"O'Hara\"]");
        assert!(sink.is_empty());
    }

    #[test]
    fn syntax_error_carries_position() {
        let err = parse_json(Path::new("houses.json"), "[1,\n  2,,]").unwrap_err();
        match &err {
            RosterError::JsonSyntax { line, column, .. } => {
                assert_eq!(*line, 2);
                assert!(*column > 0);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(err.requirement(), "1.2");
        assert!(err.to_string().starts_with("houses.json: invalid JSON (line 2, col "));
    }
}
