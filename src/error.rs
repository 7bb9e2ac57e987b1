//! Error types for reeeed.
//!
//! Four kinds terminate a request: fetch failure, no viable decoding,
//! catastrophic parse failure, and no readable content. Cancellation is
//! not an error and has no variant here.

/// Error type for extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The fetch collaborator failed. Passed through untouched.
    #[error("Fetch failed: {0}")]
    FetchError(#[from] FetchError),

    /// No viable text decoding could be produced from the input bytes.
    #[error("Encoding detection failed: {0}")]
    EncodingError(String),

    /// HTML parsing failed beyond what error recovery can repair.
    #[error("HTML parsing failed: {0}")]
    ParseError(String),

    /// The pipeline completed but no candidate cleared the content floors.
    #[error("No extractable content found")]
    NoContent,
}

/// Failure reported by a [`Fetcher`](crate::fetch::Fetcher) implementation.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Connection, DNS or TLS failure.
    #[error("network error: {0}")]
    Network(String),

    /// The collaborator's timeout elapsed.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-success status.
    #[error("HTTP status {0}")]
    Status(u16),

    /// Anything else the collaborator wants to surface.
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// True when the caller should fall back to an unprocessed view of the page.
    #[must_use]
    pub fn is_no_content(&self) -> bool {
        matches!(self, Error::NoContent)
    }
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_converts() {
        let err: Error = FetchError::Status(404).into();
        assert!(matches!(err, Error::FetchError(FetchError::Status(404))));
        assert_eq!(err.to_string(), "Fetch failed: HTTP status 404");
    }

    #[test]
    fn test_no_content_is_distinguishable() {
        assert!(Error::NoContent.is_no_content());
        assert!(!Error::ParseError("x".into()).is_no_content());
        assert!(!Error::from(FetchError::Timeout).is_no_content());
    }
}
