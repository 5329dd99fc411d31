//! Docent API crate - axum HTTP server for the chat message boundary.
//!
//! Exposes the endpoint a chat transport adapter posts inbound messages to,
//! plus a health check. Replies are returned in emit order for the adapter
//! to relay to the chat surface.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
