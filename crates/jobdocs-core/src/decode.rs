//! Warnings and modes shared by every lenient reader.

use std::{fmt, path::PathBuf};

use jobdocs_domain::Document;

use crate::CoreError;

/// A single field or file that could not be read as expected.
///
/// Row numbers are 1-based positions in the source file.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseWarning {
    MissingFile {
        path: PathBuf,
    },
    InvalidNumber {
        row: usize,
        field: &'static str,
        raw: String,
    },
    InvalidDate {
        row: usize,
        raw: String,
    },
    InvalidValue {
        row: usize,
        field: &'static str,
        raw: String,
    },
    SkippedRow {
        row: usize,
        reason: String,
    },
}

impl ParseWarning {
    pub fn row(&self) -> Option<usize> {
        match self {
            ParseWarning::MissingFile { .. } => None,
            ParseWarning::InvalidNumber { row, .. }
            | ParseWarning::InvalidDate { row, .. }
            | ParseWarning::InvalidValue { row, .. }
            | ParseWarning::SkippedRow { row, .. } => Some(*row),
        }
    }
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::MissingFile { path } => write!(f, "file not found: {}", path.display()),
            ParseWarning::InvalidNumber { row, field, raw } => {
                write!(f, "row {row}: `{raw}` is not a number for {field}, using 0.0")
            }
            ParseWarning::InvalidDate { row, raw } => {
                write!(f, "row {row}: `{raw}` is not an MM-DD-YYYY date, using today")
            }
            ParseWarning::InvalidValue { row, field, raw } => {
                write!(f, "row {row}: `{raw}` is not a valid {field}, using default")
            }
            ParseWarning::SkippedRow { row, reason } => write!(f, "row {row}: skipped ({reason})"),
        }
    }
}

/// Parses a numeric cell. Blank cells are zero without complaint.
pub fn parse_number(raw: &str, row: usize, field: &'static str) -> Result<f64, ParseWarning> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ParseWarning::InvalidNumber {
            row,
            field,
            raw: raw.to_string(),
        })
}

/// Like [`parse_number`], but also reads money as written by hand (`$1,250.50`).
pub fn parse_money(raw: &str, row: usize, field: &'static str) -> Result<f64, ParseWarning> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    parse_number(&cleaned, row, field).map_err(|_| ParseWarning::InvalidNumber {
        row,
        field,
        raw: raw.to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Substitute defaults and report warnings alongside the result.
    #[default]
    Lenient,
    /// Fail on the first warning.
    Strict,
}

/// A decoded document plus everything that had to be defaulted along the way.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub document: Document,
    pub warnings: Vec<ParseWarning>,
}

impl Decoded {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Applies the decode mode: strict mode turns the first warning into an error.
    pub fn finish(self, mode: DecodeMode) -> Result<Self, CoreError> {
        match (mode, self.warnings.first()) {
            (DecodeMode::Strict, Some(warning)) => Err(CoreError::Parse(warning.clone())),
            _ => Ok(self),
        }
    }
}
