//! Teller webhook verification and decoding.
//!
//! ```text
//! raw body + Teller-Signature + secrets → verify_signature() → decode_event() → WebhookEvent
//! ```
//!
//! The decoder never sees a body whose signature did not verify.

pub mod event;
pub mod signature;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::WebhookError;

pub use event::{
    decode_event, DisconnectReason, VerificationStatus, WebhookEvent, WebhookEventType,
    WebhookPayload,
};
pub use signature::{
    canonical_message, compute_signature, sign, verify_signature, verify_signature_at,
    SignatureHeader, Tolerance, DEFAULT_MAX_AGE, SIGNATURE_HEADER,
};

/// Verify the `Teller-Signature` header and decode the webhook body.
///
/// # Arguments
///
/// * `body` - Raw request body. This must be the exact bytes received.
/// * `signature_header` - Value of the `Teller-Signature` header
/// * `signing_secrets` - Every signing secret currently active
pub fn construct_webhook<S: AsRef<str>>(
    body: &[u8],
    signature_header: &str,
    signing_secrets: &[S],
) -> Result<WebhookEvent, WebhookError> {
    construct_webhook_at(
        body,
        signature_header,
        signing_secrets,
        &Tolerance::default(),
        Utc::now(),
    )
}

/// [`construct_webhook`] with an explicit tolerance and clock.
pub fn construct_webhook_at<S: AsRef<str>>(
    body: &[u8],
    signature_header: &str,
    signing_secrets: &[S],
    tolerance: &Tolerance,
    now: DateTime<Utc>,
) -> Result<WebhookEvent, WebhookError> {
    let signed_at = verify_signature_at(body, signature_header, signing_secrets, tolerance, now)?;
    debug!(signed_at = %signed_at, "webhook_signature_verified");

    let event = decode_event(body)?;
    info!(
        event_id = %event.id,
        event_type = %event.event_type,
        "webhook_event_decoded"
    );

    Ok(event)
}

/// A configured verifier for a webhook receiver.
///
/// Holds the active signing secrets and freshness window so each request only
/// needs the body and header.
#[derive(Debug, Clone)]
pub struct WebhookVerifier {
    secrets: Vec<String>,
    tolerance: Tolerance,
}

impl WebhookVerifier {
    /// Create a verifier with the default three minute tolerance.
    pub fn new<I, S>(secrets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            secrets: secrets.into_iter().map(Into::into).collect(),
            tolerance: Tolerance::default(),
        }
    }

    /// Replace the freshness window.
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn tolerance(&self) -> &Tolerance {
        &self.tolerance
    }

    /// Number of configured secrets. The secrets themselves are never exposed.
    pub fn secret_count(&self) -> usize {
        self.secrets.len()
    }

    /// Verify and decode against the current time.
    pub fn construct(&self, body: &[u8], signature_header: &str) -> Result<WebhookEvent, WebhookError> {
        self.construct_at(body, signature_header, Utc::now())
    }

    /// Verify and decode against an explicit `now`.
    pub fn construct_at(
        &self,
        body: &[u8],
        signature_header: &str,
        now: DateTime<Utc>,
    ) -> Result<WebhookEvent, WebhookError> {
        construct_webhook_at(body, signature_header, &self.secrets, &self.tolerance, now)
    }
}
