//! Stripe webhook primitives.
//!
//! This module provides:
//! - Signature verification for the `Stripe-Signature` header
//! - Event envelope and typed object decoding
//!
//! [`construct_event`] is the trust boundary: nothing downstream sees an
//! event that did not pass it.

pub mod event;
pub mod signature;

pub use event::{
    CheckoutSession, CustomerDetails, Event, EventData, EventKind, Invoice, TypedEvent,
};
pub use signature::{generate_header, verify_header, SignatureError};

/// Header Stripe puts the signature in.
pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// Verify a delivery and decode its event envelope.
///
/// The signature is checked against the exact bytes received before any
/// JSON decoding happens. Only a body that is not JSON at all fails after
/// that; any JSON value yields an [`Event`].
pub fn construct_event(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_secs: u64,
) -> Result<Event, SignatureError> {
    verify_header(payload, header, secret, tolerance_secs)?;
    let value: serde_json::Value = serde_json::from_slice(payload)?;
    Ok(Event::from_value(&value))
}
