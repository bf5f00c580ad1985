//! Teller webhook signature verification.
//!
//! Teller signs webhook requests using HMAC-SHA256 and sends the result in the
//! `Teller-Signature` header:
//!
//! ```text
//! Teller-Signature: t=1688960969,v1=5f0c...,v1=9a3e...
//! ```
//!
//! The signed message is `"{t}.{raw body}"`. While secrets are being rotated
//! the header carries one `v1` entry per active secret, so verification
//! accepts any configured secret against any supplied signature.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::error::{HeaderProblem, WebhookError};

type HmacSha256 = Hmac<Sha256>;

/// Name of the header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "Teller-Signature";

/// Default maximum age of a signed timestamp.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(3 * 60);

/// Freshness window applied to the signed timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tolerance {
    /// Maximum age of the signed timestamp.
    pub max_age: Duration,
    /// Maximum distance into the future a timestamp may lie.
    ///
    /// `None` accepts any future timestamp, which is how Teller's own
    /// libraries behave.
    pub max_future_skew: Option<Duration>,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            max_age: DEFAULT_MAX_AGE,
            max_future_skew: None,
        }
    }
}

impl Tolerance {
    /// Tolerance with the given maximum age and no future limit.
    pub fn max_age(max_age: Duration) -> Self {
        Self {
            max_age,
            max_future_skew: None,
        }
    }

    /// Also reject timestamps more than `skew` in the future.
    pub fn with_max_future_skew(mut self, skew: Duration) -> Self {
        self.max_future_skew = Some(skew);
        self
    }
}

/// Parsed `Teller-Signature` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader<'a> {
    /// The `t` value exactly as sent; it is part of the signed message.
    pub timestamp: &'a str,
    /// Every `v1` value, in header order.
    pub signatures: Vec<&'a str>,
}

impl<'a> SignatureHeader<'a> {
    /// Parse a raw header value.
    ///
    /// Segments are comma separated `key=value` pairs. Segments without `=`
    /// and unknown keys are skipped. A repeated `t` keeps the last value.
    pub fn parse(header: &'a str) -> Result<Self, WebhookError> {
        if header.is_empty() {
            return Err(WebhookError::MalformedHeader(HeaderProblem::Missing));
        }

        let mut timestamp = "";
        let mut signatures = Vec::new();

        for segment in header.split(',') {
            let Some((key, value)) = segment.trim().split_once('=') else {
                continue;
            };

            match key {
                "t" => timestamp = value,
                "v1" => signatures.push(value),
                _ => {}
            }
        }

        if timestamp.is_empty() {
            return Err(WebhookError::MalformedHeader(HeaderProblem::MissingTimestamp));
        }
        if signatures.is_empty() {
            return Err(WebhookError::MalformedHeader(HeaderProblem::NoSignatures));
        }

        Ok(Self {
            timestamp,
            signatures,
        })
    }

    /// The timestamp as Unix seconds.
    pub fn unix_timestamp(&self) -> Result<i64, WebhookError> {
        self.timestamp
            .parse()
            .map_err(|_| WebhookError::MalformedHeader(HeaderProblem::InvalidTimestamp))
    }
}

/// Verify a Teller webhook signature against the current time.
///
/// Returns the signed timestamp on success.
///
/// # Arguments
///
/// * `body` - The raw request body, exactly as received
/// * `header` - The `Teller-Signature` header value
/// * `secrets` - Every signing secret currently active
/// * `tolerance` - Freshness window for the signed timestamp
pub fn verify_signature<S: AsRef<str>>(
    body: &[u8],
    header: &str,
    secrets: &[S],
    tolerance: &Tolerance,
) -> Result<DateTime<Utc>, WebhookError> {
    verify_signature_at(body, header, secrets, tolerance, Utc::now())
}

/// Verify a Teller webhook signature against an explicit `now`.
pub fn verify_signature_at<S: AsRef<str>>(
    body: &[u8],
    header: &str,
    secrets: &[S],
    tolerance: &Tolerance,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, WebhookError> {
    if secrets.is_empty() {
        warn!("webhook_signature_no_secrets");
        return Err(WebhookError::Configuration);
    }

    let parsed = SignatureHeader::parse(header).inspect_err(|e| {
        warn!(error = %e, "webhook_signature_malformed_header");
    })?;

    let signed_at = parsed.unix_timestamp().inspect_err(|_| {
        warn!(timestamp = %parsed.timestamp, "webhook_signature_invalid_timestamp");
    })?;
    let signed_time = DateTime::from_timestamp(signed_at, 0).ok_or_else(|| {
        warn!(timestamp = signed_at, "webhook_signature_timestamp_out_of_range");
        WebhookError::MalformedHeader(HeaderProblem::InvalidTimestamp)
    })?;

    check_freshness(signed_time, now, tolerance)?;

    let message = canonical_message(parsed.timestamp, body);

    if !matches_any(&message, secrets, &parsed.signatures) {
        warn!(
            secret_count = secrets.len(),
            signature_count = parsed.signatures.len(),
            body_length = body.len(),
            "webhook_signature_mismatch"
        );
        return Err(WebhookError::SignatureMismatch);
    }

    Ok(signed_time)
}

/// Reject timestamps older than the tolerance, and future timestamps when a
/// skew limit is set. Sub-second precision of `now` is kept.
fn check_freshness(
    signed_time: DateTime<Utc>,
    now: DateTime<Utc>,
    tolerance: &Tolerance,
) -> Result<(), WebhookError> {
    let age = now.signed_duration_since(signed_time);
    let max_age = TimeDelta::from_std(tolerance.max_age).unwrap_or(TimeDelta::MAX);

    if age > max_age {
        warn!(
            webhook_time = signed_time.timestamp(),
            current_time = now.timestamp(),
            age_ms = age.num_milliseconds(),
            max_age_seconds = max_age.num_seconds(),
            "webhook_signature_stale"
        );
        return Err(WebhookError::StaleSignature {
            age_seconds: age.num_seconds(),
        });
    }

    if let Some(skew) = tolerance.max_future_skew {
        let max_skew = TimeDelta::from_std(skew).unwrap_or(TimeDelta::MAX);
        let ahead = -age;
        if ahead > max_skew {
            warn!(
                webhook_time = signed_time.timestamp(),
                current_time = now.timestamp(),
                ahead_ms = ahead.num_milliseconds(),
                max_future_skew_seconds = max_skew.num_seconds(),
                "webhook_signature_from_future"
            );
            return Err(WebhookError::StaleSignature {
                age_seconds: age.num_seconds(),
            });
        }
    }

    Ok(())
}

/// Build the exact byte string Teller signs: `"{timestamp}.{body}"`.
pub fn canonical_message(timestamp: &str, body: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(timestamp.len() + 1 + body.len());
    message.extend_from_slice(timestamp.as_bytes());
    message.push(b'.');
    message.extend_from_slice(body);
    message
}

/// Try every secret against every signature.
///
/// Undecodable signatures never match. Each comparison is constant time.
fn matches_any<S: AsRef<str>>(message: &[u8], secrets: &[S], signatures: &[&str]) -> bool {
    let provided: Vec<Vec<u8>> = signatures
        .iter()
        .filter_map(|sig| hex::decode(sig).ok())
        .collect();

    for secret in secrets {
        let expected = digest(secret.as_ref(), message);

        for candidate in &provided {
            if bool::from(expected.as_slice().ct_eq(candidate.as_slice())) {
                return true;
            }
        }
    }

    false
}

fn digest(secret: &str, message: &[u8]) -> Vec<u8> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message);
    mac.finalize().into_bytes().to_vec()
}

/// Compute the hex `v1` signature for a body signed at `timestamp`.
pub fn compute_signature(secret: &str, timestamp: i64, body: &[u8]) -> String {
    let message = canonical_message(&timestamp.to_string(), body);
    hex::encode(digest(secret, &message))
}

/// Build a complete `Teller-Signature` header value, one `v1` per secret.
///
/// Useful for exercising a webhook receiver locally.
pub fn sign<S: AsRef<str>>(secrets: &[S], timestamp: i64, body: &[u8]) -> String {
    let mut header = format!("t={timestamp}");
    for secret in secrets {
        header.push_str(",v1=");
        header.push_str(&compute_signature(secret.as_ref(), timestamp, body));
    }
    header
}
