//! Failure taxonomy for content API reads.
//!
//! These errors never cross the [`Directory`](crate::Directory) boundary.
//! Fetchers log them and degrade to an empty result.

/// Maximum number of characters of an error body kept for diagnostics
pub const ERROR_BODY_LIMIT: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Network unreachable, connection reset, timeout
    #[error("Transport failure for {url}: {reason}")]
    Transport { url: String, reason: String },

    /// Backend answered with a non-2xx status
    #[error("Content API error {status} for {url}: {body}")]
    Status { status: u16, url: String, body: String },

    /// Response body was not the expected JSON envelope
    #[error("Failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("Invalid content API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl FetchError {
    pub fn status(status: u16, url: impl Into<String>, body: &str) -> Self {
        Self::Status {
            status,
            url: url.into(),
            body: truncate_body(body),
        }
    }

    /// HTTP status code, when the backend produced one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    body.chars().take(ERROR_BODY_LIMIT).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_truncates_body() {
        let body = "x".repeat(500);
        let err = FetchError::status(403, "http://cms/items/person", &body);
        match &err {
            FetchError::Status { body, .. } => assert_eq!(body.len(), ERROR_BODY_LIMIT),
            other => panic!("unexpected variant: {other:?}"),
        }
        assert_eq!(err.status_code(), Some(403));
    }

    #[test]
    fn test_transport_error_has_no_status() {
        let err = FetchError::Transport {
            url: "http://cms".into(),
            reason: "connection refused".into(),
        };
        assert_eq!(err.status_code(), None);
        assert!(err.to_string().contains("connection refused"));
    }
}
