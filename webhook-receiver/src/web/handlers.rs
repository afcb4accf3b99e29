//! Webhook endpoint handlers.
//!
//! The Stripe handler runs one linear pass per delivery:
//! 1. Capture the raw body
//! 2. Verify the `Stripe-Signature` header against it
//! 3. Route on event type
//! 4. Acknowledge
//!
//! Every early exit is a [`WebhookError`], which renders its own response.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::dispatch::dispatch_event;
use crate::stripe::{construct_event, SignatureError, SIGNATURE_HEADER};
use crate::web::error::WebhookError;
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
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
// Stripe Webhook
// =============================================================================

/// Webhook acknowledgment.
#[derive(Serialize)]
pub struct WebhookResponse {
    pub received: bool,
}

/// Stripe webhook endpoint.
///
/// The body is taken as raw bytes: the signature covers exactly what Stripe
/// sent, so nothing may decode or re-encode it before verification.
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<WebhookResponse>, WebhookError> {
    let body = body.map_err(|e| {
        error!(error = %e, "stripe_webhook_body_read_failed");
        WebhookError::Body(e.to_string())
    })?;

    let signature = match headers.get(SIGNATURE_HEADER) {
        Some(value) => value.to_str().map_err(|_| {
            warn!(body_length = body.len(), "stripe_signature_not_ascii");
            WebhookError::from(SignatureError::MalformedHeader)
        })?,
        None => {
            warn!(body_length = body.len(), "stripe_signature_missing");
            return Err(WebhookError::MissingSignature);
        }
    };

    let event = construct_event(
        &body,
        signature,
        &state.config.stripe_webhook_secret,
        state.config.signature_tolerance_secs,
    )
    .map_err(|e| {
        warn!(reason = %e, body_length = body.len(), "stripe_signature_invalid");
        WebhookError::from(e)
    })?;

    let kind = event.kind();
    info!(
        event_id = event.id.as_deref(),
        event_type = kind.as_str(),
        created = event.created,
        livemode = event.livemode,
        "stripe_webhook_received"
    );

    dispatch_event(&event).map_err(|e| {
        error!(
            event_id = event.id.as_deref(),
            event_type = kind.as_str(),
            error = %e,
            "stripe_webhook_processing_failed"
        );
        WebhookError::from(e)
    })?;

    Ok(Json(WebhookResponse { received: true }))
}

/// Fallback for any method other than POST on the webhook route.
pub async fn method_not_allowed(method: Method) -> impl IntoResponse {
    warn!(method = %method, "stripe_webhook_method_not_allowed");
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST")],
        "Method Not Allowed",
    )
}
