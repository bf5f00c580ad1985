//! Teller - client library for the Teller banking API.
//!
//! This library provides:
//! - `webhook`: verification and decoding of signed Teller webhooks
//! - `api`: account, transaction, identity and institution endpoints
//! - `web`: an axum router for receiving webhooks, used by `teller-web`
//!
//! ## Webhook flow
//!
//! ```text
//! raw body + Teller-Signature → verify (HMAC-SHA256, freshness) → decode → WebhookEvent
//! ```

#[macro_use]
mod macros;

pub mod api;
pub mod config;
pub mod error;
pub mod web;
pub mod webhook;

// Re-export commonly used types
pub use api::{ApiClient, ClientConfig, RequestOptions};
pub use config::Config;
pub use error::{ApiError, HeaderProblem, WebhookError};
pub use webhook::{construct_webhook, WebhookEvent, WebhookEventType, WebhookPayload, WebhookVerifier};
