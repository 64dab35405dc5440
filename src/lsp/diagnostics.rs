//! Conversion of checker issues into LSP diagnostics

use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, Position, Range};
use tracing::warn;

use crate::checker::types::RawIssue;
use crate::error::ConfigError;

/// Source tag attached to every diagnostic
pub const DIAGNOSTIC_SOURCE: &str = "csslint";

/// Map raw issues to diagnostics, keeping at most `cap` of them.
///
/// Order is preserved and truncation is applied from the front. Issues
/// without a valid 1-based position are skipped and do not count towards
/// the cap.
pub fn map_issues(issues: &[RawIssue], cap: i64) -> Result<Vec<Diagnostic>, ConfigError> {
    let cap = usize::try_from(cap).map_err(|_| {
        ConfigError::InvalidConfiguration(format!(
            "maxNumberOfProblems must not be negative, got {cap}"
        ))
    })?;

    Ok(issues
        .iter()
        .filter_map(create_diagnostic)
        .take(cap)
        .collect())
}

/// Create a zero-width diagnostic anchored at the issue position.
/// Returns None if the issue has no usable position.
fn create_diagnostic(issue: &RawIssue) -> Option<Diagnostic> {
    let Some((line, character)) = issue.position() else {
        warn!(
            "Skipping issue with invalid position (line: {:?}, col: {:?}): {}",
            issue.line, issue.col, issue.message
        );
        return None;
    };

    let severity = if issue.is_warning() {
        DiagnosticSeverity::WARNING
    } else {
        DiagnosticSeverity::ERROR
    };

    let position = Position { line, character };

    Some(Diagnostic {
        range: Range {
            start: position,
            end: position,
        },
        severity: Some(severity),
        message: issue.message.clone(),
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn issues(count: u32) -> Vec<RawIssue> {
        (1..=count)
            .map(|i| {
                if i % 2 == 0 {
                    RawIssue::error(i, 1, format!("issue {i}"))
                } else {
                    RawIssue::warning(i, 1, format!("issue {i}"))
                }
            })
            .collect()
    }

    #[test]
    fn map_issues_converts_positions_and_severities() {
        let raw = vec![
            RawIssue::new(3, 5, "warning", "m1"),
            RawIssue::new(7, 1, "error", "m2"),
        ];

        let diagnostics = map_issues(&raw, 100).unwrap();

        assert_eq!(
            diagnostics,
            vec![
                Diagnostic {
                    range: Range {
                        start: Position {
                            line: 2,
                            character: 4
                        },
                        end: Position {
                            line: 2,
                            character: 4
                        },
                    },
                    severity: Some(DiagnosticSeverity::WARNING),
                    message: "m1".to_string(),
                    source: Some("csslint".to_string()),
                    ..Default::default()
                },
                Diagnostic {
                    range: Range {
                        start: Position {
                            line: 6,
                            character: 0
                        },
                        end: Position {
                            line: 6,
                            character: 0
                        },
                    },
                    severity: Some(DiagnosticSeverity::ERROR),
                    message: "m2".to_string(),
                    source: Some("csslint".to_string()),
                    ..Default::default()
                },
            ]
        );
    }

    #[rstest]
    #[case("warning", DiagnosticSeverity::WARNING)]
    #[case("error", DiagnosticSeverity::ERROR)]
    #[case("info", DiagnosticSeverity::ERROR)]
    #[case("WARNING", DiagnosticSeverity::ERROR)]
    #[case("", DiagnosticSeverity::ERROR)]
    fn map_issues_uses_two_severity_buckets(
        #[case] kind: &str,
        #[case] expected: DiagnosticSeverity,
    ) {
        let diagnostics = map_issues(&[RawIssue::new(1, 1, kind, "m")], 100).unwrap();

        assert_eq!(diagnostics[0].severity, Some(expected));
    }

    #[rstest]
    #[case(5, 0, 0)]
    #[case(5, 2, 2)]
    #[case(5, 5, 5)]
    #[case(5, 100, 5)]
    #[case(0, 3, 0)]
    fn map_issues_truncates_to_prefix_of_full_mapping(
        #[case] count: u32,
        #[case] cap: i64,
        #[case] expected_len: usize,
    ) {
        let raw = issues(count);
        let full = map_issues(&raw, i64::MAX).unwrap();

        let capped = map_issues(&raw, cap).unwrap();

        assert_eq!(capped.len(), expected_len);
        assert_eq!(capped.as_slice(), &full[..expected_len]);
    }

    #[test]
    fn map_issues_rejects_negative_cap() {
        let result = map_issues(&issues(3), -1);

        assert!(matches!(
            result,
            Err(ConfigError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn map_issues_skips_malformed_issues_and_keeps_the_rest() {
        let raw = vec![
            RawIssue::warning(1, 1, "first"),
            RawIssue {
                line: None,
                col: Some(4),
                kind: "error".to_string(),
                message: "no line".to_string(),
            },
            RawIssue::error(0, 2, "zero line"),
            RawIssue::error(2, 3, "second"),
        ];

        let diagnostics = map_issues(&raw, 2).unwrap();

        let messages: Vec<_> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[test]
    fn map_issues_produces_zero_width_ranges() {
        let diagnostics = map_issues(&issues(4), 100).unwrap();

        assert!(diagnostics.iter().all(|d| d.range.start == d.range.end));
    }
}
