//! Webhook error types and their HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::stripe::SignatureError;

/// Everything that can stop a delivery from being acknowledged.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// No `Stripe-Signature` header on the request.
    #[error("Missing Stripe signature")]
    MissingSignature,

    /// The delivery failed verification.
    #[error("Webhook Error: {0}")]
    Signature(#[from] SignatureError),

    /// Reading the request body failed.
    #[error("failed to read request body: {0}")]
    Body(String),

    /// The event verified but could not be processed.
    #[error("failed to process event: {0}")]
    Processing(#[from] serde_json::Error),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        match &self {
            Self::MissingSignature | Self::Signature(_) => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            // Details stay in the server log.
            Self::Body(_) | Self::Processing(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Webhook handler error",
                }),
            )
                .into_response(),
        }
    }
}
