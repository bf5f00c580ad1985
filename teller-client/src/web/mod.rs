//! Web server module for receiving Teller webhooks.
//!
//! - `GET /health`
//! - `POST /webhooks/teller`: verify, decode, acknowledge
//!
//! Delivery retries are Teller's concern; the receiver only answers whether
//! a single delivery was authentic.

pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use handlers::{health, teller_webhook, AppState, HealthResponse, WebhookResponse};

/// Build the receiver's router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/webhooks/teller", post(teller_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
