//! Deterministic checker for driving the server in tests

use csslint_lsp::checker::{CheckError, Checker, RawIssue};

/// Reports one issue per non-empty line, at column 1, whose kind is the
/// trimmed line text. A line reading `fail` makes the whole check fail.
#[allow(dead_code)]
pub struct LineKindChecker;

impl Checker for LineKindChecker {
    fn check(&self, text: &str) -> Result<Vec<RawIssue>, CheckError> {
        let mut issues = Vec::new();

        for (index, line) in text.lines().enumerate() {
            let kind = line.trim();
            if kind.is_empty() {
                continue;
            }
            if kind == "fail" {
                return Err(CheckError::Failed("scripted failure".to_string()));
            }
            issues.push(RawIssue::new(
                index as u32 + 1,
                1,
                kind,
                format!("{kind} on line {}", index + 1),
            ));
        }

        Ok(issues)
    }
}
