//! Event router and validation pipeline
//!
//! The router owns the document store and the settings state and processes
//! inbound events strictly one at a time. It is the only component that
//! publishes diagnostics.
//!
//! ```text
//! Backend ──Event──▶ mpsc ──▶ Router ──▶ DocumentStore / SettingsState
//!                                │
//!                                ▼
//!                     Checker ──▶ map_issues ──▶ Publisher
//! ```

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use serde_json::Value;
use tokio::sync::mpsc::UnboundedReceiver;
use tower_lsp::lsp_types::{FileEvent, MessageType, Url};
use tracing::{debug, error, info, warn};

use crate::checker::traits::{CheckError, Checker};
use crate::checker::types::RawIssue;
use crate::config::SettingsState;
use crate::document::DocumentStore;
use crate::lsp::diagnostics::map_issues;
use crate::lsp::publisher::Publisher;

/// Inbound lifecycle events, in the order the client delivered them
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The initialize handshake completed
    Initialized { workspace_root: Option<String> },
    /// A document was opened or its full text changed
    DocumentChanged {
        uri: Url,
        version: Option<i32>,
        text: String,
    },
    /// A document was closed
    DocumentClosed { uri: Url },
    /// The client pushed new settings
    ConfigurationChanged { settings: Value },
    /// Watched files changed on disk
    WatchedFilesChanged { changes: Vec<FileEvent> },
}

/// Connection lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Uninitialized,
    Ready,
}

pub struct Router<C: Checker, P: Publisher> {
    checker: C,
    publisher: P,
    documents: DocumentStore,
    settings: SettingsState,
    state: ConnectionState,
    workspace_root: Option<String>,
}

impl<C: Checker, P: Publisher> Router<C, P> {
    pub fn new(checker: C, publisher: P, settings: SettingsState) -> Self {
        Self {
            checker,
            publisher,
            documents: DocumentStore::new(),
            settings,
            state: ConnectionState::Uninitialized,
            workspace_root: None,
        }
    }

    /// Drain the event queue until every sender is dropped
    pub async fn run(mut self, mut events: UnboundedReceiver<Event>) {
        while let Some(event) = events.recv().await {
            self.handle(event).await;
        }
        info!("Event queue closed, router stopped");
    }

    /// Process a single event to completion
    pub async fn handle(&mut self, event: Event) {
        if self.state == ConnectionState::Uninitialized
            && !matches!(event, Event::Initialized { .. })
        {
            warn!("Received event before initialize: {:?}", event);
        }

        match event {
            Event::Initialized { workspace_root } => self.on_initialized(workspace_root),
            Event::DocumentChanged { uri, version, text } => {
                self.on_document_changed(uri, version, text).await
            }
            Event::DocumentClosed { uri } => self.on_document_closed(uri).await,
            Event::ConfigurationChanged { settings } => {
                self.on_configuration_changed(settings).await
            }
            Event::WatchedFilesChanged { changes } => {
                self.on_watched_files_changed(changes).await
            }
        }
    }

    fn on_initialized(&mut self, workspace_root: Option<String>) {
        if self.state == ConnectionState::Ready {
            warn!("Received initialize while already initialized");
        }

        info!("Workspace root: {:?}", workspace_root);
        self.workspace_root = workspace_root;
        self.state = ConnectionState::Ready;
    }

    async fn on_document_changed(&mut self, uri: Url, version: Option<i32>, text: String) {
        if self.documents.is_stale(&uri, version) {
            debug!("Ignoring stale change for {} (version {:?})", uri, version);
            return;
        }

        self.documents.upsert(uri.clone(), text, version);
        self.validate(&uri).await;
    }

    async fn on_document_closed(&mut self, uri: Url) {
        self.documents.remove(&uri);

        if self.settings.current().clear_problems_on_document_close {
            debug!("Clearing diagnostics for closed document {}", uri);
            self.publisher
                .publish_diagnostics(uri, Vec::new(), None)
                .await;
        }
    }

    async fn on_configuration_changed(&mut self, raw: Value) {
        match self.settings.update(&raw) {
            Ok(settings) => info!("Settings updated: {:?}", settings),
            Err(e) => {
                warn!("Rejected configuration change: {}", e);
                self.publisher
                    .log_message(
                        MessageType::WARNING,
                        format!("{e}; keeping previous settings"),
                    )
                    .await;
                return;
            }
        }

        let uris = self.documents.all_ids();
        debug!("Revalidating {} open documents", uris.len());
        for uri in &uris {
            self.validate(uri).await;
        }
    }

    async fn on_watched_files_changed(&mut self, changes: Vec<FileEvent>) {
        info!("Received {} watched file changes", changes.len());
        self.publisher
            .log_message(
                MessageType::LOG,
                format!("Received {} watched file change events", changes.len()),
            )
            .await;
    }

    /// Check the current text of `uri` and publish its full diagnostic set.
    ///
    /// Unknown documents are skipped. A failing checker clears the
    /// document's diagnostics.
    pub async fn validate(&self, uri: &Url) {
        let document = match self.documents.get(uri) {
            Ok(document) => document,
            Err(e) => {
                debug!("Skipping validation: {}", e);
                return;
            }
        };

        let issues = match run_checker(&self.checker, &document.text) {
            Ok(issues) => issues,
            Err(e) => {
                error!("Checker failed for {}: {}", uri, e);
                self.publisher
                    .log_message(MessageType::ERROR, format!("Failed to check {uri}: {e}"))
                    .await;
                self.publisher
                    .publish_diagnostics(uri.clone(), Vec::new(), document.version)
                    .await;
                return;
            }
        };

        let cap = i64::try_from(self.settings.current().max_number_of_problems)
            .unwrap_or(i64::MAX);
        let diagnostics = match map_issues(&issues, cap) {
            Ok(diagnostics) => diagnostics,
            Err(e) => {
                error!("Failed to map issues for {}: {}", uri, e);
                self.publisher
                    .log_message(MessageType::ERROR, e.to_string())
                    .await;
                return;
            }
        };

        debug!(
            "Publishing {} diagnostics ({} issues) for {}",
            diagnostics.len(),
            issues.len(),
            uri
        );

        self.publisher
            .publish_diagnostics(uri.clone(), diagnostics, document.version)
            .await;
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    pub fn settings(&self) -> &SettingsState {
        &self.settings
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn workspace_root(&self) -> Option<&str> {
        self.workspace_root.as_deref()
    }
}

/// Run the checker, turning a panic into a `CheckError`
fn run_checker<C: Checker>(checker: &C, text: &str) -> Result<Vec<RawIssue>, CheckError> {
    panic::catch_unwind(AssertUnwindSafe(|| checker.check(text)))
        .unwrap_or_else(|payload| Err(CheckError::Panicked(panic_message(&*payload))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
