pub mod checker;
pub mod config;
pub mod document;
pub mod error;
pub mod lsp;
