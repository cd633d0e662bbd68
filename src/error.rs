//! Error types for warpgen
//!
//! Every stage of the pipeline either returns a value or a labeled failure
//! that terminates the run; nothing is caught and suppressed along the way.
//! Errors are categorized by subsystem and include recovery hints.

use std::io;

use thiserror::Error;

/// Top-level error type for warpgen
#[derive(Debug, Error)]
pub enum WarpgenError {
    /// Key material generation errors
    #[error("Key error: {0}")]
    Key(#[from] KeyError),

    /// Registration API errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Service response validation errors
    #[error("Invalid response: {0}")]
    Validation(#[from] ValidationError),

    /// YAML serialization errors
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// I/O errors (output file writing)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl WarpgenError {
    /// Check if this error is recoverable (the whole run can be retried)
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Key(e) => e.is_recoverable(),
            Self::Api(e) => e.is_recoverable(),
            Self::Validation(_) | Self::Yaml(_) => false,
            Self::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
            ),
        }
    }
}

/// Key material generation errors
#[derive(Debug, Error)]
pub enum KeyError {
    /// The system entropy source failed
    #[error("entropy source unavailable: {0}")]
    EntropyUnavailable(String),

    /// A fixed-length assumption in the DER templates did not hold
    #[error("{what}: expected {expected} bytes, got {actual}")]
    EncodingInvariant {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Every redraw produced an out-of-range scalar; the entropy source
    /// itself answered, so this points at the curve bounds check, not at
    /// the system RNG
    #[error("no valid P-256 scalar after {attempts} redraws")]
    ScalarSamplingExhausted { attempts: u32 },
}

impl KeyError {
    /// Key errors always abort the run
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        false
    }
}

/// Registration API errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request did not complete within the configured timeout
    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The service answered with a non-success status
    #[error("registration failed: {status} - {body}")]
    RegistrationFailed { status: u16, body: String },

    /// Transport-level request failure
    #[error("API request failed: {0}")]
    Request(String),

    /// HTTP request building failed
    #[error("HTTP request building failed: {0}")]
    HttpBuild(#[from] hyper::http::Error),

    /// TLS connector setup failed
    #[error("TLS error: {0}")]
    Tls(String),

    /// Request/response JSON handling failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    /// Check if this error is recoverable
    ///
    /// Timeouts and transport failures may succeed on a fresh run; a rejected
    /// registration will not, since the payload or auth is usually the cause.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Request(_))
    }
}

/// Service response validation errors
///
/// Each unmet extraction rule is a distinct variant so the failing field is
/// visible in the error message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no token in response")]
    MissingToken,

    #[error("no peer in response")]
    MissingPeer,

    #[error("no peer public key in response")]
    MissingPeerKey,

    #[error("no usable peer endpoint in response")]
    MissingEndpoint,

    #[error("no interface address in response")]
    MissingAddress,
}

/// Type alias for Result with WarpgenError
pub type Result<T> = std::result::Result<T, WarpgenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovery_classification() {
        let timeout = ApiError::Timeout { seconds: 30 };
        assert!(timeout.is_recoverable());

        let rejected = ApiError::RegistrationFailed {
            status: 403,
            body: "forbidden".into(),
        };
        assert!(!rejected.is_recoverable());

        let key_err = KeyError::EntropyUnavailable("no entropy".into());
        assert!(!key_err.is_recoverable());

        let validation: WarpgenError = ValidationError::MissingPeer.into();
        assert!(!validation.is_recoverable());
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::RegistrationFailed {
            status: 429,
            body: "too many requests".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("429"));
        assert!(msg.contains("too many requests"));

        let err = KeyError::EncodingInvariant {
            what: "P-256 public point",
            expected: 65,
            actual: 33,
        };
        assert!(err.to_string().contains("expected 65 bytes, got 33"));
    }
}
