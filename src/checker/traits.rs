//! Checker trait definition

#[cfg(test)]
use mockall::automock;

use crate::checker::types::RawIssue;

/// A style checker: maps full document text to raw issues.
///
/// Implementations must not keep state between calls; the same text always
/// yields the same issues.
#[cfg_attr(test, automock)]
pub trait Checker: Send + Sync + 'static {
    /// Check the full text of a document
    fn check(&self, text: &str) -> Result<Vec<RawIssue>, CheckError>;
}

/// Error type for checker failures
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// The checker could not process the text
    #[error("Check failed: {0}")]
    Failed(String),

    /// Tree-sitter related error
    #[error("Tree-sitter error: {0}")]
    TreeSitter(String),

    /// The checker panicked
    #[error("Checker panicked: {0}")]
    Panicked(String),
}
