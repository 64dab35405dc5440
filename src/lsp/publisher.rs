//! Outbound side of the connection

use async_trait::async_trait;
use tower_lsp::Client;
use tower_lsp::lsp_types::{Diagnostic, MessageType, Url};

/// Sink for everything the server sends to the client.
///
/// `publish_diagnostics` has full-replace semantics: the published set
/// supersedes whatever was previously published for `uri`.
#[async_trait]
pub trait Publisher: Send + Sync + 'static {
    async fn publish_diagnostics(&self, uri: Url, diagnostics: Vec<Diagnostic>, version: Option<i32>);

    async fn log_message(&self, typ: MessageType, message: String);
}

#[async_trait]
impl Publisher for Client {
    async fn publish_diagnostics(&self, uri: Url, diagnostics: Vec<Diagnostic>, version: Option<i32>) {
        Client::publish_diagnostics(self, uri, diagnostics, version).await;
    }

    async fn log_message(&self, typ: MessageType, message: String) {
        Client::log_message(self, typ, message).await;
    }
}
