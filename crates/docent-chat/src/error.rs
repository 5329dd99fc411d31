//! Error types for turn pipelines.

/// Errors from the upload and question pipelines.
///
/// One variant per pipeline step, so the turn boundary can log precisely
/// which remote call or state lookup failed before replacing the error with
/// the generic user-facing reply.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("download failed: {0}")]
    Download(String),
    #[error("extraction failed: {0}")]
    Extraction(String),
    #[error("chunk processing failed: {0}")]
    Processing(String),
    #[error("relevance selection failed: {0}")]
    Relevance(String),
    #[error("conversation state inconsistent: {0}")]
    StateInconsistency(String),
    #[error("answer generation failed: {0}")]
    Answer(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        let err = ChatError::Download("connection refused".to_string());
        assert_eq!(err.to_string(), "download failed: connection refused");

        let err = ChatError::Extraction("HTTP 500".to_string());
        assert_eq!(err.to_string(), "extraction failed: HTTP 500");

        let err = ChatError::Processing("missing summary".to_string());
        assert_eq!(err.to_string(), "chunk processing failed: missing summary");

        let err = ChatError::Relevance("HTTP 502".to_string());
        assert_eq!(err.to_string(), "relevance selection failed: HTTP 502");

        let err = ChatError::StateInconsistency("no stored text".to_string());
        assert_eq!(
            err.to_string(),
            "conversation state inconsistent: no stored text"
        );

        let err = ChatError::Answer("missing field".to_string());
        assert_eq!(err.to_string(), "answer generation failed: missing field");
    }

    #[test]
    fn test_errors_implement_debug() {
        let err = ChatError::StateInconsistency("poisoned".to_string());
        assert!(format!("{:?}", err).contains("StateInconsistency"));
    }
}
