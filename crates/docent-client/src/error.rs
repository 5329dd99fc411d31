//! Error types for backend API calls.

use thiserror::Error;

/// Errors from the backend HTTP gateway.
///
/// HTTP-level failures and body decode failures are distinct variants so the
/// caller can tell a dead backend from a contract violation.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a usable response (connect, timeout, transport).
    #[error("request to {path} failed: {detail}")]
    Request { path: String, detail: String },

    /// The backend answered with a non-success status code.
    #[error("backend returned HTTP {status} for {path}")]
    Status { status: u16, path: String },

    /// The response body was not the JSON shape the contract promises.
    #[error("invalid response body from {path}: {detail}")]
    Decode { path: String, detail: String },
}

impl ClientError {
    pub(crate) fn request(path: &str, err: &reqwest::Error) -> Self {
        let detail = if err.is_connect() {
            format!("connection failed: {}", err)
        } else if err.is_timeout() {
            "request timed out".to_string()
        } else {
            err.to_string()
        };
        ClientError::Request {
            path: path.to_string(),
            detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let err = ClientError::Status {
            status: 502,
            path: "/get_answer/".to_string(),
        };
        assert_eq!(err.to_string(), "backend returned HTTP 502 for /get_answer/");
    }

    #[test]
    fn test_decode_display() {
        let err = ClientError::Decode {
            path: "/extract_text/".to_string(),
            detail: "missing field `chunks`".to_string(),
        };
        assert!(err.to_string().contains("/extract_text/"));
        assert!(err.to_string().contains("missing field"));
    }

    #[test]
    fn test_request_display() {
        let err = ClientError::Request {
            path: "http://files/doc.pdf".to_string(),
            detail: "connection failed".to_string(),
        };
        assert!(err.to_string().contains("http://files/doc.pdf"));
    }

    #[test]
    fn test_errors_implement_debug() {
        let err = ClientError::Status {
            status: 404,
            path: "/select_relevant/".to_string(),
        };
        assert!(format!("{:?}", err).contains("Status"));
    }
}
