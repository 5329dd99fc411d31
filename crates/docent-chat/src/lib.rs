//! Turn handling for the document Q&A relay.
//!
//! Classifies inbound chat messages, drives the backend pipelines
//! (upload and question), and keeps per-conversation document state
//! across turns.

pub mod error;
pub mod orchestrator;
pub mod router;
pub mod store;

pub use error::ChatError;
pub use orchestrator::TurnOrchestrator;
pub use router::{Intent, TurnRouter};
pub use store::{ConversationStore, DocumentRecord, MemoryStore};
