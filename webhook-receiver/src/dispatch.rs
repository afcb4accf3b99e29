//! Event routing for verified Stripe events.
//!
//! ## Processing Flow
//!
//! ```text
//! Event → dispatch_event() → TypedEvent (+ structured log record)
//! ```
//!
//! Nothing is persisted yet; each handled kind logs the fields the
//! fulfilment steps will need. Absent fields are left out of the record.

use tracing::info;

use crate::stripe::{CheckoutSession, Event, Invoice, TypedEvent};

/// Route a verified event to the handler for its type.
///
/// Returns the decoded event so callers can see what was extracted.
/// Unrecognized types are not an error.
pub fn dispatch_event(event: &Event) -> Result<TypedEvent, serde_json::Error> {
    let typed = event.decode()?;

    match &typed {
        TypedEvent::CheckoutSessionCompleted(session) => handle_checkout_completed(session),
        TypedEvent::InvoicePaid(invoice) => handle_invoice_paid(invoice),
        TypedEvent::Unrecognized(event_type) => {
            info!(
                event_id = event.id.as_deref(),
                event_type = %event_type,
                "stripe_event_unhandled"
            );
        }
    }

    Ok(typed)
}

fn handle_checkout_completed(session: &CheckoutSession) {
    info!(
        session_id = session.id.as_deref(),
        customer_email = session.email(),
        customer_name = session
            .customer_details
            .as_ref()
            .and_then(|d| d.name.as_deref()),
        amount_total = session.amount_total,
        currency = session.currency.as_deref(),
        payment_status = session.payment_status.as_deref(),
        "checkout_session_completed"
    );

    // TODO: issue an activation code for the session, store it, and email
    // it to the customer once the persistence and mail backends exist.
}

fn handle_invoice_paid(invoice: &Invoice) {
    info!(
        invoice_id = invoice.id.as_deref(),
        customer = invoice.customer.as_deref(),
        total = invoice.total,
        currency = invoice.currency.as_deref(),
        subscription = invoice.subscription.as_deref(),
        "invoice_paid"
    );

    // TODO: mark the customer's subscription active once subscription
    // state is stored.
}
