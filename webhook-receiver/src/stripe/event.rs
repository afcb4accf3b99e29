//! Stripe event envelope and the typed objects this service acts on.
//!
//! The envelope is decoded once the signature has been checked. The
//! `data.object` payload stays untyped until routing, where it is decoded
//! into the shape that matches the event's `type`.

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

/// Verified Stripe event envelope.
///
/// Every envelope field is optional and tolerates the wrong JSON type, so a
/// verified body always yields an event. Shape problems surface later, in
/// [`Event::decode`], and only for the kinds this service acts on.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Event {
    /// Event ID (`evt_...`)
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    /// Event type, e.g. `checkout.session.completed`
    #[serde(default, rename = "type", deserialize_with = "lenient")]
    pub event_type: Option<String>,
    /// Unix timestamp of when the event was created
    #[serde(default, deserialize_with = "lenient")]
    pub created: Option<i64>,
    /// Whether the event came from live mode
    #[serde(default, deserialize_with = "lenient")]
    pub livemode: Option<bool>,
    /// Event data
    #[serde(default, deserialize_with = "lenient")]
    pub data: EventData,
}

/// Event data container.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventData {
    /// The object the event describes; shape depends on the event type
    #[serde(default)]
    pub object: Value,
}

/// Decode a field, falling back to its default when it has the wrong shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Event types this service knows how to handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    CheckoutSessionCompleted,
    InvoicePaid,
    /// Any other type; acknowledged but not acted on
    Unrecognized(String),
}

impl EventKind {
    pub fn parse(event_type: &str) -> Self {
        match event_type {
            "checkout.session.completed" => EventKind::CheckoutSessionCompleted,
            "invoice.paid" => EventKind::InvoicePaid,
            other => EventKind::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EventKind::CheckoutSessionCompleted => "checkout.session.completed",
            EventKind::InvoicePaid => "invoice.paid",
            EventKind::Unrecognized(other) => other,
        }
    }
}

/// An event with its object decoded according to its type.
#[derive(Debug, Clone)]
pub enum TypedEvent {
    CheckoutSessionCompleted(CheckoutSession),
    InvoicePaid(Invoice),
    Unrecognized(String),
}

impl Event {
    /// Build the envelope from an already-parsed body.
    ///
    /// Non-object bodies (arrays, strings, numbers) give an empty envelope,
    /// which routes as an unrecognized event.
    pub fn from_value(value: &Value) -> Self {
        Event::deserialize(value).unwrap_or_default()
    }

    pub fn kind(&self) -> EventKind {
        EventKind::parse(self.event_type.as_deref().unwrap_or_default())
    }

    /// Decode `data.object` for the known event kinds.
    ///
    /// Missing fields decode as `None`; a missing or non-object payload, or
    /// a field of the wrong JSON type, fails.
    pub fn decode(&self) -> Result<TypedEvent, serde_json::Error> {
        Ok(match self.kind() {
            EventKind::CheckoutSessionCompleted => TypedEvent::CheckoutSessionCompleted(
                CheckoutSession::deserialize(&self.data.object)?,
            ),
            EventKind::InvoicePaid => {
                TypedEvent::InvoicePaid(Invoice::deserialize(&self.data.object)?)
            }
            EventKind::Unrecognized(other) => TypedEvent::Unrecognized(other),
        })
    }
}

/// Stripe Checkout session object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutSession {
    /// Session ID (`cs_...`)
    #[serde(default)]
    pub id: Option<String>,
    /// Details the customer entered during checkout
    #[serde(default)]
    pub customer_details: Option<CustomerDetails>,
    /// Email passed in when the session was created
    #[serde(default)]
    pub customer_email: Option<String>,
    /// Total amount in the smallest currency unit
    #[serde(default)]
    pub amount_total: Option<i64>,
    /// Three-letter ISO currency code
    #[serde(default)]
    pub currency: Option<String>,
    /// `paid`, `unpaid` or `no_payment_required`
    #[serde(default)]
    pub payment_status: Option<String>,
}

impl CheckoutSession {
    /// Customer email, preferring what was collected at checkout.
    pub fn email(&self) -> Option<&str> {
        self.customer_details
            .as_ref()
            .and_then(|d| d.email.as_deref())
            .or(self.customer_email.as_deref())
    }
}

/// Customer details collected by Checkout.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerDetails {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Stripe invoice object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Invoice {
    /// Invoice ID (`in_...`)
    #[serde(default)]
    pub id: Option<String>,
    /// Customer ID (`cus_...`)
    #[serde(default)]
    pub customer: Option<String>,
    /// Total in the smallest currency unit
    #[serde(default)]
    pub total: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    /// Subscription the invoice was billed for, if any
    #[serde(default)]
    pub subscription: Option<String>,
}
