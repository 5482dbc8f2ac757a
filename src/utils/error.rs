//! Error types and handling
//!
//! All failures surfaced by this crate fall into a small taxonomy. Configuration
//! conflicts are detected before any network call and are never retried. Backend
//! failures carry the backend's message text verbatim and are not retried
//! internally; retry policy belongs to the caller. Only the propagation poller
//! retries, and only while waiting for asynchronous third-party confirmation.

use thiserror::Error;

/// Library error types
#[derive(Debug, Error)]
pub enum Error {
    /// Mutually exclusive request fields were both supplied. Raised before any
    /// network call is made.
    #[error("Configuration conflict: {0}")]
    ConfigConflict(String),

    /// A backend call failed. The backend's message is passed through verbatim,
    /// including any structured error codes embedded in the text.
    #[error("PKI backend error: {0}")]
    Backend(String),

    /// The propagation poll budget was exhausted with third parties still
    /// unconfirmed. Names exactly the missing connectors, never the found ones.
    #[error("Third-party propagation incomplete, unconfirmed: {}", missing.join(", "))]
    PropagationTimeout {
        /// Connectors that never appeared in the propagation status list
        missing: Vec<String>,
    },

    /// The read-time liveness check failed. Not a user-facing failure: it signals
    /// that the local copy must be dropped and the certificate re-enrolled. The
    /// reconciler's `read` expresses this signal as `Ok(None)`; the variant is
    /// for callers that run the liveness check themselves via `classify` and
    /// want an error-shaped result to thread through `?`.
    #[error("Local state invalidated: {0}")]
    StateInvalidated(String),

    /// Invalid client or poll configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Backend("PKI backend request timed out".to_string())
        } else if err.is_connect() {
            Error::Backend("Failed to connect to PKI backend".to_string())
        } else {
            Error::Backend(err.to_string())
        }
    }
}

/// Result type alias for lifecycle operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::ConfigConflict(
            "the parameter 'key_type' is not compatible with the parameter 'csr'".to_string(),
        );
        assert_eq!(
            err.to_string(),
            "Configuration conflict: the parameter 'key_type' is not compatible with the parameter 'csr'"
        );
    }

    #[test]
    fn test_propagation_timeout_names_missing_connectors() {
        let err = Error::PropagationTimeout {
            missing: vec!["scep-gateway".to_string(), "acme-mirror".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("scep-gateway"));
        assert!(msg.contains("acme-mirror"));
    }

    #[test]
    fn test_state_invalidated_carries_the_reason() {
        let err = Error::StateInvalidated("certificate cert-1 was revoked".to_string());
        assert_eq!(
            err.to_string(),
            "Local state invalidated: certificate cert-1 was revoked"
        );
    }

    #[test]
    fn test_backend_message_passthrough() {
        let err = Error::Backend("REQ-010: Profile does not exist or is disabled".to_string());
        assert!(err.to_string().contains("REQ-010"));
    }
}
