//! LSP (Language Server Protocol) implementation layer
//!
//! This module handles communication with editors via LSP and publishes
//! CSS lint findings as diagnostics.
//!
//! # Modules
//!
//! - [`backend`]: tower-lsp `LanguageServer` front end that queues events
//! - [`diagnostics`]: Maps checker issues to LSP diagnostics
//! - [`publisher`]: Outbound publish/log seam, implemented for `Client`
//! - [`router`]: Single-worker event router and validation pipeline
//! - [`server`]: LSP server initialization and lifecycle

pub mod backend;
pub mod diagnostics;
pub mod publisher;
pub mod router;
pub mod server;
