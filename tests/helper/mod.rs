//! Shared helpers for LSP E2E tests

pub mod checker;
pub mod lsp;

#[allow(unused_imports)]
pub use checker::LineKindChecker;
#[allow(unused_imports)]
pub use lsp::*;
