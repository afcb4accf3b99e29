//! Web server module for handling Stripe webhooks.
//!
//! This module provides a single-purpose web server that:
//! - Receives Stripe webhook deliveries
//! - Verifies their signatures against the raw body
//! - Routes the verified event by type and acknowledges it
//!
//! No work outlives the request that triggered it.

pub mod error;
pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use error::{ErrorResponse, WebhookError};
pub use handlers::{
    health, method_not_allowed, stripe_webhook, AppState, HealthResponse, WebhookResponse,
};

/// Path Stripe is configured to deliver to.
pub const WEBHOOK_PATH: &str = "/api/stripe-webhook";

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            WEBHOOK_PATH,
            post(stripe_webhook).fallback(method_not_allowed),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
