//! HTTP gateway to the backend document API.
//!
//! Wraps the extract/process/select/answer endpoints behind the [`Backend`]
//! trait with typed request and response schemas, so callers never touch
//! dynamic JSON and tests can substitute mocks.

pub mod backend;
pub mod error;

pub use backend::{
    AnswerResponse, Backend, BackendClient, ExtractResponse, ProcessResponse, RelevanceResponse,
};
pub use error::ClientError;
