//! Turn orchestrator: central coordinator wiring router, store, and backend.
//!
//! Each inbound message is one turn. The orchestrator classifies it, runs
//! the matching pipeline as a chain of sequential awaited backend calls, and
//! returns the ordered replies for the transport to send. Pipeline errors
//! never escape a turn: they are logged in full and replaced with a single
//! generic reply.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use docent_client::Backend;
use docent_core::config::{RouterConfig, UploadConfig};
use docent_core::types::{Attachment, IncomingMessage};

use crate::error::ChatError;
use crate::router::{Intent, TurnRouter};
use crate::store::{ConversationStore, DocumentRecord};

/// Reply for messages that match no command token.
pub const UNKNOWN_REPLY: &str = "Please upload a document or ask a question.";

/// Reply sent when any pipeline step fails.
pub const GENERIC_ERROR_REPLY: &str = "Sorry, something went wrong. Please try again.";

/// Reply for a question asked before any document was uploaded.
pub const UPLOAD_FIRST_REPLY: &str = "Please upload a document before asking a question.";

/// Reply for a question command with no question text.
pub const EMPTY_QUESTION_REPLY: &str = "Please include the question after the command.";

/// First reply of a successful upload.
pub const UPLOAD_CONFIRMATION_REPLY: &str = "Document uploaded and processed successfully.";

/// Central turn orchestrator.
pub struct TurnOrchestrator {
    router: TurnRouter,
    backend: Arc<dyn Backend>,
    store: Arc<dyn ConversationStore>,
    upload: UploadConfig,
}

impl TurnOrchestrator {
    /// Create an orchestrator over the given backend and store.
    pub fn new(
        backend: Arc<dyn Backend>,
        store: Arc<dyn ConversationStore>,
        router: RouterConfig,
        upload: UploadConfig,
    ) -> Self {
        Self {
            router: TurnRouter::new(router),
            backend,
            store,
            upload,
        }
    }

    /// Handle one inbound message and return the ordered replies.
    ///
    /// This is the turn boundary: every [`ChatError`] from a pipeline is
    /// logged here and translated into [`GENERIC_ERROR_REPLY`]. The
    /// conversation continues; the user may retry on the next turn.
    pub async fn handle_turn(&self, message: &IncomingMessage) -> Vec<String> {
        match self.router.classify(&message.text) {
            Intent::Upload => match self.run_upload(message).await {
                Ok(replies) => replies,
                Err(e) => {
                    tracing::error!(
                        conversation = %message.conversation_id,
                        error = %e,
                        "Upload turn failed"
                    );
                    vec![GENERIC_ERROR_REPLY.to_string()]
                }
            },
            Intent::Question(question) => {
                match self.run_question(&message.conversation_id, &question).await {
                    Ok(replies) => replies,
                    Err(e) => {
                        tracing::error!(
                            conversation = %message.conversation_id,
                            error = %e,
                            "Question turn failed"
                        );
                        vec![GENERIC_ERROR_REPLY.to_string()]
                    }
                }
            }
            Intent::Unknown => vec![UNKNOWN_REPLY.to_string()],
        }
    }

    // -----------------------------------------------------------------
    // Upload pipeline
    // -----------------------------------------------------------------

    /// download -> extract -> process -> store, then confirmation + preview.
    ///
    /// State is written only after the last remote step succeeds, so a
    /// failed upload leaves previously stored documents untouched.
    async fn run_upload(&self, message: &IncomingMessage) -> Result<Vec<String>, ChatError> {
        let attachment = self.pick_attachment(&message.attachments)?;
        let label = attachment
            .name
            .clone()
            .unwrap_or_else(|| format!("document-{}", Uuid::new_v4()));

        let bytes = self
            .backend
            .download_bytes(&attachment.content_url)
            .await
            .map_err(|e| ChatError::Download(e.to_string()))?;

        let extraction = self
            .backend
            .extract_text(&label, &attachment.content_type, bytes)
            .await
            .map_err(|e| ChatError::Extraction(e.to_string()))?;
        if extraction.chunks.is_empty() {
            return Err(ChatError::Extraction(format!(
                "backend returned no chunks for '{}'",
                label
            )));
        }

        let processed = self
            .backend
            .process_chunks(&label, &extraction.chunks, &extraction.chunk_tokens)
            .await
            .map_err(|e| ChatError::Processing(e.to_string()))?;

        let now = Utc::now();
        let mut records = HashMap::with_capacity(processed.documents.len());
        for (key, text) in processed.documents {
            let summary = processed.summaries.get(&key).cloned().ok_or_else(|| {
                ChatError::Processing(format!("backend returned no summary for '{}'", key))
            })?;
            let token_count = processed.token_counts.get(&key).copied().unwrap_or(0);
            records.insert(
                key,
                DocumentRecord {
                    summary,
                    text,
                    token_count,
                    stored_at: now,
                },
            );
        }
        if records.is_empty() {
            return Err(ChatError::Processing(format!(
                "backend returned no documents for '{}'",
                label
            )));
        }

        let stored = records.len();
        self.store
            .insert_documents(&message.conversation_id, records)?;
        tracing::info!(
            conversation = %message.conversation_id,
            document = %label,
            documents_stored = stored,
            chunks = extraction.chunks.len(),
            "Document stored"
        );

        let preview = truncate_preview(&extraction.chunks[0], self.upload.preview_max_bytes);
        Ok(vec![
            UPLOAD_CONFIRMATION_REPLY.to_string(),
            format!("Extracted text: {}", preview),
        ])
    }

    /// First attachment whose content type is accepted.
    fn pick_attachment<'a>(
        &self,
        attachments: &'a [Attachment],
    ) -> Result<&'a Attachment, ChatError> {
        attachments
            .iter()
            .find(|a| self.accepts(&a.content_type))
            .ok_or_else(|| {
                ChatError::Download("message carries no acceptable attachment".to_string())
            })
    }

    fn accepts(&self, content_type: &str) -> bool {
        self.upload.accepted_content_types.is_empty()
            || self
                .upload
                .accepted_content_types
                .iter()
                .any(|accepted| accepted == content_type)
    }

    // -----------------------------------------------------------------
    // Question pipeline
    // -----------------------------------------------------------------

    /// guard -> select relevant -> look up text -> answer.
    async fn run_question(
        &self,
        conversation_id: &str,
        question: &str,
    ) -> Result<Vec<String>, ChatError> {
        let question = question.trim();
        if question.is_empty() {
            return Ok(vec![EMPTY_QUESTION_REPLY.to_string()]);
        }

        let summaries = self.store.summaries(conversation_id);
        if summaries.is_empty() {
            return Ok(vec![UPLOAD_FIRST_REPLY.to_string()]);
        }

        let relevance = self
            .backend
            .select_relevant(question, &summaries)
            .await
            .map_err(|e| ChatError::Relevance(e.to_string()))?;
        let label = relevance.most_relevant.trim();
        if label.is_empty() {
            return Err(ChatError::StateInconsistency(
                "backend selected no document".to_string(),
            ));
        }

        let document_text = self
            .store
            .document_text(conversation_id, label)
            .ok_or_else(|| {
                ChatError::StateInconsistency(format!(
                    "no stored text for selected document '{}'",
                    label
                ))
            })?;

        let answer = self
            .backend
            .get_answer(question, &document_text)
            .await
            .map_err(|e| ChatError::Answer(e.to_string()))?;

        tracing::debug!(
            conversation = %conversation_id,
            document = %label,
            "Question answered"
        );
        Ok(vec![format!("Answer: {}", answer.answer)])
    }
}

/// Truncate text to `max_bytes` on a char boundary, marking the cut.
fn truncate_preview(text: &str, max_bytes: usize) -> String {
    if text.len() <= max_bytes {
        return text.to_string();
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

// =============================================================================
// Tests
// =============================================================================
