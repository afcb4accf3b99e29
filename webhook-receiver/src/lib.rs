//! Stripe webhook receiver.
//!
//! Accepts Stripe webhook deliveries, verifies their signatures, and routes
//! checkout and invoice events.
//!
//! ## Request Flow
//!
//! ```text
//! POST → raw body → Stripe-Signature check → event routing → {"received": true}
//! ```

pub mod config;
pub mod dispatch;
pub mod stripe;
pub mod web;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use config::{Config, ConfigError};
pub use dispatch::dispatch_event;
pub use stripe::{construct_event, Event, EventKind, SignatureError, TypedEvent};
pub use web::{router, AppState, WebhookError, WEBHOOK_PATH};
