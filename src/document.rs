//! In-memory store of open documents

use indexmap::IndexMap;
use tower_lsp::lsp_types::Url;

use crate::error::DocumentError;

/// A single open document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Latest full text reported by the editor
    pub text: String,
    /// Editor-reported version of `text`
    pub version: Option<i32>,
}

/// Tracks the documents currently open in the editor.
///
/// Holds at most one entry per URI. Not synchronized; it is owned by the
/// event router, which is the only writer.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: IndexMap<Url, Document>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or overwrite the document for `uri`.
    pub fn upsert(&mut self, uri: Url, text: String, version: Option<i32>) {
        self.documents.insert(uri, Document { text, version });
    }

    /// Get the current document for `uri`.
    pub fn get(&self, uri: &Url) -> Result<&Document, DocumentError> {
        self.documents
            .get(uri)
            .ok_or_else(|| DocumentError::NotFound(uri.to_string()))
    }

    /// Remove the document for `uri`; absent entries are ignored.
    pub fn remove(&mut self, uri: &Url) {
        self.documents.shift_remove(uri);
    }

    /// Snapshot of the URIs of all open documents, in open order.
    pub fn all_ids(&self) -> Vec<Url> {
        self.documents.keys().cloned().collect()
    }

    /// Whether an update carrying `version` is older than what is stored.
    pub fn is_stale(&self, uri: &Url, version: Option<i32>) -> bool {
        match (self.documents.get(uri).and_then(|doc| doc.version), version) {
            (Some(current), Some(incoming)) => incoming < current,
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
