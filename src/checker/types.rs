//! Common types for checkers

use serde::{Deserialize, Serialize};

/// Kind tag for an issue that maps to a warning; every other kind is an error
pub const WARNING_KIND: &str = "warning";
pub const ERROR_KIND: &str = "error";

/// One issue as reported by a checker.
///
/// `line` and `col` are 1-based. They are optional because checkers are
/// external collaborators; issues without a usable position are skipped when
/// mapped to diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawIssue {
    pub line: Option<u32>,
    pub col: Option<u32>,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub message: String,
}

impl RawIssue {
    pub fn new(line: u32, col: u32, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            line: Some(line),
            col: Some(col),
            kind: kind.into(),
            message: message.into(),
        }
    }

    pub fn warning(line: u32, col: u32, message: impl Into<String>) -> Self {
        Self::new(line, col, WARNING_KIND, message)
    }

    pub fn error(line: u32, col: u32, message: impl Into<String>) -> Self {
        Self::new(line, col, ERROR_KIND, message)
    }

    /// Zero-based (line, character) of the issue, or None when the reported
    /// position is missing or not 1-based.
    pub fn position(&self) -> Option<(u32, u32)> {
        match (self.line, self.col) {
            (Some(line), Some(col)) if line >= 1 && col >= 1 => Some((line - 1, col - 1)),
            _ => None,
        }
    }

    pub fn is_warning(&self) -> bool {
        self.kind == WARNING_KIND
    }
}
