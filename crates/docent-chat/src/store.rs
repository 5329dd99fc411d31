//! Per-conversation document state.
//!
//! Documents uploaded in a conversation are only visible to later turns of
//! that same conversation. The store is injected into the orchestrator so
//! deployments can swap the in-memory implementation for a durable one.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::error::ChatError;

/// A stored document: condensed summary for relevance selection, full text
/// for answering.
#[derive(Clone, Debug)]
pub struct DocumentRecord {
    /// Condensed representation fed to the relevance endpoint.
    pub summary: String,
    /// Full extracted text fed to the answer endpoint.
    pub text: String,
    /// Backend-reported token count for the full text.
    pub token_count: u32,
    /// When the document was stored.
    pub stored_at: DateTime<Utc>,
}

/// Conversation-keyed document storage.
///
/// Reads return owned values so callers never hold a lock across an await
/// point. Writes are all-or-nothing: `insert_documents` merges a whole batch
/// under one lock acquisition.
pub trait ConversationStore: Send + Sync {
    /// Summaries of every document stored for a conversation.
    fn summaries(&self, conversation_id: &str) -> HashMap<String, String>;

    /// Full text of one stored document, if present.
    fn document_text(&self, conversation_id: &str, label: &str) -> Option<String>;

    /// Merge a batch of documents into a conversation's state.
    fn insert_documents(
        &self,
        conversation_id: &str,
        documents: HashMap<String, DocumentRecord>,
    ) -> Result<(), ChatError>;

    /// Number of documents stored for a conversation.
    fn document_count(&self, conversation_id: &str) -> usize;
}

/// In-memory [`ConversationStore`] backed by a mutex-guarded map.
#[derive(Default)]
pub struct MemoryStore {
    conversations: Mutex<HashMap<String, HashMap<String, DocumentRecord>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConversationStore for MemoryStore {
    fn summaries(&self, conversation_id: &str) -> HashMap<String, String> {
        let conversations = match self.conversations.lock() {
            Ok(c) => c,
            Err(e) => {
                tracing::error!("Conversation store lock poisoned: {}", e);
                return HashMap::new();
            }
        };
        conversations
            .get(conversation_id)
            .map(|docs| {
                docs.iter()
                    .map(|(label, record)| (label.clone(), record.summary.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn document_text(&self, conversation_id: &str, label: &str) -> Option<String> {
        let conversations = self.conversations.lock().ok()?;
        conversations
            .get(conversation_id)
            .and_then(|docs| docs.get(label))
            .map(|record| record.text.clone())
    }

    fn insert_documents(
        &self,
        conversation_id: &str,
        documents: HashMap<String, DocumentRecord>,
    ) -> Result<(), ChatError> {
        let mut conversations = self.conversations.lock().map_err(|e| {
            ChatError::StateInconsistency(format!("conversation store lock poisoned: {}", e))
        })?;
        conversations
            .entry(conversation_id.to_string())
            .or_default()
            .extend(documents);
        Ok(())
    }

    fn document_count(&self, conversation_id: &str) -> usize {
        let conversations = match self.conversations.lock() {
            Ok(c) => c,
            Err(e) => {
                tracing::error!("Conversation store lock poisoned: {}", e);
                return 0;
            }
        };
        conversations
            .get(conversation_id)
            .map(|docs| docs.len())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(summary: &str, text: &str) -> DocumentRecord {
        DocumentRecord {
            summary: summary.to_string(),
            text: text.to_string(),
            token_count: 10,
            stored_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_store() {
        let store = MemoryStore::new();
        assert!(store.summaries("c1").is_empty());
        assert_eq!(store.document_count("c1"), 0);
        assert!(store.document_text("c1", "doc1").is_none());
    }

    #[test]
    fn test_insert_and_read_back() {
        let store = MemoryStore::new();
        store
            .insert_documents(
                "c1",
                HashMap::from([("doc1".to_string(), record("summary", "full text"))]),
            )
            .unwrap();

        assert_eq!(store.document_count("c1"), 1);
        assert_eq!(store.summaries("c1")["doc1"], "summary");
        assert_eq!(store.document_text("c1", "doc1").unwrap(), "full text");
    }

    #[test]
    fn test_conversations_are_isolated() {
        let store = MemoryStore::new();
        store
            .insert_documents(
                "c1",
                HashMap::from([("doc1".to_string(), record("s", "t"))]),
            )
            .unwrap();

        assert_eq!(store.document_count("c1"), 1);
        assert_eq!(store.document_count("c2"), 0);
        assert!(store.document_text("c2", "doc1").is_none());
    }

    #[test]
    fn test_insert_merges_across_uploads() {
        let store = MemoryStore::new();
        store
            .insert_documents(
                "c1",
                HashMap::from([("doc1".to_string(), record("s1", "t1"))]),
            )
            .unwrap();
        store
            .insert_documents(
                "c1",
                HashMap::from([("doc2".to_string(), record("s2", "t2"))]),
            )
            .unwrap();

        assert_eq!(store.document_count("c1"), 2);
        let summaries = store.summaries("c1");
        assert_eq!(summaries["doc1"], "s1");
        assert_eq!(summaries["doc2"], "s2");
    }

    #[test]
    fn test_reupload_same_label_overwrites() {
        let store = MemoryStore::new();
        store
            .insert_documents(
                "c1",
                HashMap::from([("doc1".to_string(), record("old", "old text"))]),
            )
            .unwrap();
        store
            .insert_documents(
                "c1",
                HashMap::from([("doc1".to_string(), record("new", "new text"))]),
            )
            .unwrap();

        assert_eq!(store.document_count("c1"), 1);
        assert_eq!(store.document_text("c1", "doc1").unwrap(), "new text");
    }

    #[test]
    fn test_missing_label_returns_none() {
        let store = MemoryStore::new();
        store
            .insert_documents(
                "c1",
                HashMap::from([("doc1".to_string(), record("s", "t"))]),
            )
            .unwrap();
        assert!(store.document_text("c1", "doc2").is_none());
    }
}
