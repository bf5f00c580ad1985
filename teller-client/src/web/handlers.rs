//! Webhook endpoint handlers.
//!
//! The Teller handler reads the body as raw bytes. Extracting it as JSON
//! first would re-encode it and break the signature.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::WebhookError;
use crate::webhook::{WebhookVerifier, SIGNATURE_HEADER};
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub verifier: Arc<WebhookVerifier>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let verifier =
            WebhookVerifier::new(config.signing_secrets.clone()).with_tolerance(config.tolerance());
        Self {
            config: Arc::new(config),
            verifier: Arc::new(verifier),
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Teller Webhook
// =============================================================================

/// Webhook response.
#[derive(Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

impl WebhookResponse {
    fn rejected(status: &'static str) -> Json<Self> {
        Json(Self {
            status,
            event_id: None,
        })
    }
}

/// Teller webhook endpoint.
///
/// This endpoint:
/// 1. Verifies the `Teller-Signature` header against the configured secrets
/// 2. Decodes the event
/// 3. Returns 200 OK, or a 4xx that does not reveal why verification failed
pub async fn teller_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    info!(
        body_length = body.len(),
        has_signature = !signature.is_empty(),
        "teller_webhook_received"
    );

    match state.verifier.construct(&body, signature) {
        Ok(event) => {
            info!(
                event_id = %event.id,
                event_type = %event.event_type,
                account_id = ?event.payload.account_id,
                enrollment_id = ?event.payload.enrollment_id,
                transaction_count = event.payload.transactions.as_ref().map(Vec::len).unwrap_or(0),
                "teller_webhook_accepted"
            );
            (
                StatusCode::OK,
                Json(WebhookResponse {
                    status: "received",
                    event_id: Some(event.id),
                }),
            )
        }
        Err(e) => {
            let (status, label) = rejection(&e);
            if status.is_server_error() {
                error!(error = %e, "teller_webhook_misconfigured");
            } else {
                warn!(error = %e, status_code = status.as_u16(), "teller_webhook_rejected");
            }
            (status, WebhookResponse::rejected(label))
        }
    }
}

/// Map a verification error to a response status and public label.
fn rejection(error: &WebhookError) -> (StatusCode, &'static str) {
    match error {
        WebhookError::Configuration => (StatusCode::INTERNAL_SERVER_ERROR, "error"),
        WebhookError::MalformedHeader(_) => (StatusCode::BAD_REQUEST, "bad_request"),
        WebhookError::StaleSignature { .. } | WebhookError::SignatureMismatch => {
            (StatusCode::UNAUTHORIZED, "unauthorized")
        }
        WebhookError::Decode(_) => (StatusCode::BAD_REQUEST, "invalid_payload"),
    }
}
