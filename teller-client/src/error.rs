//! Error types for webhook verification and API calls.
//!
//! Verification failures are kept distinct from decode failures so a caller
//! can tell "genuine sender, bad payload" apart from "forged or expired".
//! None of the messages carry secret material or computed digests.

use thiserror::Error;

/// Errors produced while verifying and decoding a Teller webhook.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// No signing secrets were configured.
    #[error("no signing secrets provided")]
    Configuration,

    /// The `Teller-Signature` header is absent or unparsable.
    #[error("malformed signature header: {0}")]
    MalformedHeader(HeaderProblem),

    /// The signed timestamp is outside the freshness window.
    #[error("signature timestamp outside tolerance ({age_seconds}s from now)")]
    StaleSignature {
        /// Signed age in seconds; negative when the timestamp is in the future
        age_seconds: i64,
    },

    /// No configured secret produced any of the supplied signatures.
    #[error("signature verification failed")]
    SignatureMismatch,

    /// The verified body is not a valid webhook event.
    #[error("failed to decode webhook event: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Which part of the signature header was unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeaderProblem {
    #[error("missing Teller-Signature header")]
    Missing,
    #[error("missing signature timestamp")]
    MissingTimestamp,
    #[error("no signatures found")]
    NoSignatures,
    #[error("invalid signature timestamp")]
    InvalidTimestamp,
}

/// Errors produced by the Teller API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The mutual TLS certificate or key could not be loaded.
    #[error("failed to load client certificate: {0}")]
    Certificate(String),

    /// The configured base URL or a derived endpoint is invalid.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Transport-level failure.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("teller api returned {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Error message from the response body, if any
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result alias for API client operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
