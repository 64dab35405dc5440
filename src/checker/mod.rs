//! Checker layer
//! - traits.rs: Checker trait definition and CheckError
//! - types.rs: RawIssue produced by checkers
//! - css.rs: built-in tree-sitter based CSS checker

pub mod css;
pub mod traits;
pub mod types;

pub use css::CssChecker;
pub use traits::{CheckError, Checker};
pub use types::RawIssue;
