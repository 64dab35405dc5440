use tokio::sync::mpsc::{self, UnboundedSender};
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};
use tracing::{debug, error};

use crate::checker::css::CssChecker;
use crate::checker::traits::Checker;
use crate::config::{DEFAULT_SETTINGS_SECTION, SettingsState};
use crate::lsp::router::{Event, Router};

/// tower-lsp front end.
///
/// Every notification is turned into an [`Event`] and queued for the router
/// task before the handler first yields, so events reach the router in the
/// order the client sent them.
pub struct Backend {
    client: Client,
    events: UnboundedSender<Event>,
}

impl Backend {
    pub fn new(client: Client) -> Self {
        Self::build(client, CssChecker::new(), DEFAULT_SETTINGS_SECTION)
    }

    /// Build a Backend with a custom checker and settings section, and spawn
    /// its router task on the current tokio runtime
    pub fn build<C: Checker>(client: Client, checker: C, settings_section: &str) -> Self {
        let (events, receiver) = mpsc::unbounded_channel();
        let router = Router::new(
            checker,
            client.clone(),
            SettingsState::new(settings_section),
        );
        tokio::spawn(router.run(receiver));

        Self { client, events }
    }

    pub fn server_capabilities() -> ServerCapabilities {
        ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Options(
                TextDocumentSyncOptions {
                    open_close: Some(true),
                    change: Some(TextDocumentSyncKind::FULL),
                    ..Default::default()
                },
            )),
            completion_provider: Some(CompletionOptions {
                resolve_provider: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn dispatch(&self, event: Event) {
        if let Err(e) = self.events.send(event) {
            error!("Router is not running, dropping event: {:?}", e.0);
        }
    }
}

/// Workspace root from the initialize params: first workspace folder, then
/// `rootUri`, then the deprecated `rootPath`
#[allow(deprecated)]
fn workspace_root(params: &InitializeParams) -> Option<String> {
    params
        .workspace_folders
        .as_ref()
        .and_then(|folders| folders.first())
        .map(|folder| folder.uri.to_string())
        .or_else(|| params.root_uri.as_ref().map(Url::to_string))
        .or_else(|| params.root_path.clone().filter(|path| !path.is_empty()))
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        self.dispatch(Event::Initialized {
            workspace_root: workspace_root(&params),
        });

        self.client
            .log_message(MessageType::INFO, "LSP server initializing")
            .await;
        Ok(InitializeResult {
            capabilities: Self::server_capabilities(),
            server_info: Some(ServerInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "LSP server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        self.client
            .log_message(MessageType::INFO, "LSP server shutting down")
            .await;
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        debug!("Document opened: {}", params.text_document.uri);

        self.dispatch(Event::DocumentChanged {
            uri: params.text_document.uri,
            version: Some(params.text_document.version),
            text: params.text_document.text,
        });
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        // With FULL sync mode, the last content change contains the full document text
        let Some(text) = params.content_changes.into_iter().last().map(|c| c.text) else {
            return;
        };

        debug!("Document changed: {}", params.text_document.uri);

        self.dispatch(Event::DocumentChanged {
            uri: params.text_document.uri,
            version: Some(params.text_document.version),
            text,
        });
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        debug!("Document closed: {}", params.text_document.uri);

        self.dispatch(Event::DocumentClosed {
            uri: params.text_document.uri,
        });
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        debug!("Configuration changed");

        self.dispatch(Event::ConfigurationChanged {
            settings: params.settings,
        });
    }

    async fn did_change_watched_files(&self, params: DidChangeWatchedFilesParams) {
        self.dispatch(Event::WatchedFilesChanged {
            changes: params.changes,
        });
    }

    // Completion is advertised for compatibility with existing clients but
    // has no items to offer.
    async fn completion(&self, _params: CompletionParams) -> Result<Option<CompletionResponse>> {
        Ok(None)
    }

    async fn completion_resolve(&self, item: CompletionItem) -> Result<CompletionItem> {
        Ok(item)
    }
}
