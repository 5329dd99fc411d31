//! Application state shared across all route handlers.

use std::sync::Arc;
use std::time::Instant;

use docent_chat::TurnOrchestrator;

/// Shared application state, passed to handlers via axum's State extractor.
#[derive(Clone)]
pub struct AppState {
    /// Turn orchestrator handling every inbound message.
    pub orchestrator: Arc<TurnOrchestrator>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState around an orchestrator.
    pub fn new(orchestrator: Arc<TurnOrchestrator>) -> Self {
        Self {
            orchestrator,
            start_time: Instant::now(),
        }
    }
}
