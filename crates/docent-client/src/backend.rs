//! Typed client for the backend document API.
//!
//! One operation per endpoint, each a single attempt with no retry. Retry
//! policy, if any, belongs to the caller.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use docent_core::config::BackendConfig;

use crate::error::ClientError;

const EXTRACT_PATH: &str = "/extract_text/";
const PROCESS_PATH: &str = "/process_chunks/";
const SELECT_PATH: &str = "/select_relevant/";
const ANSWER_PATH: &str = "/get_answer/";

// =============================================================================
// Wire types
// =============================================================================

/// Response from `POST /extract_text/`.
#[derive(Clone, Debug, Deserialize)]
pub struct ExtractResponse {
    /// Ordered text chunks extracted from the document.
    pub chunks: Vec<String>,
    /// Token count per chunk, parallel to `chunks`.
    #[serde(default)]
    pub chunk_tokens: Vec<u32>,
}

#[derive(Serialize)]
struct ProcessRequest<'a> {
    file_name: &'a str,
    chunks: &'a [String],
    chunk_tokens: &'a [u32],
}

/// Response from `POST /process_chunks/`.
#[derive(Clone, Debug, Deserialize)]
pub struct ProcessResponse {
    /// Full document text keyed by document label.
    pub documents: HashMap<String, String>,
    /// Condensed summary keyed by document label.
    pub summaries: HashMap<String, String>,
    /// Token count keyed by document label.
    #[serde(default)]
    pub token_counts: HashMap<String, u32>,
}

#[derive(Serialize)]
struct RelevanceRequest<'a> {
    question: &'a str,
    summaries: &'a HashMap<String, String>,
}

/// Response from `POST /select_relevant/`.
#[derive(Clone, Debug, Deserialize)]
pub struct RelevanceResponse {
    /// Label of the document judged most relevant to the question.
    pub most_relevant: String,
    /// Per-document relevance scores, when the backend reports them.
    #[serde(default)]
    pub relevance_scores: HashMap<String, f64>,
}

#[derive(Serialize)]
struct AnswerRequest<'a> {
    question: &'a str,
    document_text: &'a str,
}

/// Response from `POST /get_answer/`.
#[derive(Clone, Debug, Deserialize)]
pub struct AnswerResponse {
    /// Generated answer text.
    pub answer: String,
}

// =============================================================================
// Backend trait
// =============================================================================

/// Remote operations the turn pipelines depend on.
///
/// Implemented by [`BackendClient`] for the real API; tests substitute mocks.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fetch raw file bytes from an attachment URL.
    async fn download_bytes(&self, url: &str) -> Result<Vec<u8>, ClientError>;

    /// Submit file bytes for text extraction.
    async fn extract_text(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<ExtractResponse, ClientError>;

    /// Submit extracted chunks for summarization and storage preparation.
    async fn process_chunks(
        &self,
        file_name: &str,
        chunks: &[String],
        chunk_tokens: &[u32],
    ) -> Result<ProcessResponse, ClientError>;

    /// Ask the backend which stored document best matches a question.
    async fn select_relevant(
        &self,
        question: &str,
        summaries: &HashMap<String, String>,
    ) -> Result<RelevanceResponse, ClientError>;

    /// Generate an answer to a question over one document's text.
    async fn get_answer(
        &self,
        question: &str,
        document_text: &str,
    ) -> Result<AnswerResponse, ClientError>;
}

// =============================================================================
// BackendClient
// =============================================================================

/// reqwest-backed implementation of [`Backend`].
pub struct BackendClient {
    base_url: String,
    client: reqwest::Client,
}

impl BackendClient {
    /// Create a client for the configured backend.
    pub fn new(config: &BackendConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST a JSON body to `path` and decode a JSON response.
    async fn post_json<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, ClientError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::request(path, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        response.json::<Resp>().await.map_err(|e| ClientError::Decode {
            path: path.to_string(),
            detail: e.to_string(),
        })
    }
}

#[async_trait]
impl Backend for BackendClient {
    async fn download_bytes(&self, url: &str) -> Result<Vec<u8>, ClientError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::request(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                path: url.to_string(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::request(url, &e))?;
        tracing::debug!(url = %url, len = bytes.len(), "Attachment downloaded");
        Ok(bytes.to_vec())
    }

    async fn extract_text(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<ExtractResponse, ClientError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|e| ClientError::Request {
                path: EXTRACT_PATH.to_string(),
                detail: format!("invalid content type '{}': {}", content_type, e),
            })?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.url(EXTRACT_PATH))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClientError::request(EXTRACT_PATH, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                path: EXTRACT_PATH.to_string(),
            });
        }

        response
            .json::<ExtractResponse>()
            .await
            .map_err(|e| ClientError::Decode {
                path: EXTRACT_PATH.to_string(),
                detail: e.to_string(),
            })
    }

    async fn process_chunks(
        &self,
        file_name: &str,
        chunks: &[String],
        chunk_tokens: &[u32],
    ) -> Result<ProcessResponse, ClientError> {
        let request = ProcessRequest {
            file_name,
            chunks,
            chunk_tokens,
        };
        self.post_json(PROCESS_PATH, &request).await
    }

    async fn select_relevant(
        &self,
        question: &str,
        summaries: &HashMap<String, String>,
    ) -> Result<RelevanceResponse, ClientError> {
        let request = RelevanceRequest {
            question,
            summaries,
        };
        self.post_json(SELECT_PATH, &request).await
    }

    async fn get_answer(
        &self,
        question: &str,
        document_text: &str,
    ) -> Result<AnswerResponse, ClientError> {
        let request = AnswerRequest {
            question,
            document_text,
        };
        self.post_json(ANSWER_PATH, &request).await
    }
}

// =============================================================================
// Tests
// =============================================================================
