//! Crate-level error type
//!
//! Per-query search failures never surface here: adapters convert them into
//! failure-flavored `SearchResult`s. This type covers the fatal paths only:
//! bad configuration, missing credentials, and model calls whose failure
//! aborts the whole session.

use thiserror::Error;

/// Fatal errors for a research session
#[derive(Debug, Error)]
pub enum DeepSearchError {
    /// Configuration is structurally invalid (unknown provider, bad value)
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A required secret is missing or empty; detected at construction time
    #[error("missing credential: {0} is not configured")]
    MissingCredential(&'static str),

    /// A planning or synthesis model call failed; aborts the session
    #[error("model call failed: {0}")]
    ModelCall(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DeepSearchError::MissingCredential("YOU_API_KEY");
        assert!(err.to_string().contains("YOU_API_KEY"));

        let err = DeepSearchError::ModelCall("connection refused".to_string());
        assert!(err.to_string().contains("connection refused"));
    }
}
