//! Stripe webhook signature verification.
//!
//! Stripe signs each delivery with HMAC-SHA256 over `"{timestamp}.{raw body}"`
//! and sends the result in the `Stripe-Signature` header:
//!
//! ```text
//! Stripe-Signature: t=1492774577,v1=5257a869e7ecebeda32affa62cdca3fa51cad7e77a0e56ff536d0ce8e108d8bd
//! ```
//!
//! Reference: https://docs.stripe.com/webhooks#verify-manually

use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Signature scheme Stripe uses for live signatures.
const EXPECTED_SCHEME: &str = "v1";

/// Reasons a delivery fails verification.
///
/// The messages match the ones Stripe's own libraries report so they read
/// the same in the dashboard's delivery log.
#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("Unable to extract timestamp and signatures from header")]
    MalformedHeader,

    #[error("No signatures found with expected scheme")]
    NoExpectedScheme,

    #[error("No signatures found matching the expected signature for payload")]
    NoMatchingSignature,

    #[error("Timestamp outside the tolerance zone")]
    TimestampOutsideTolerance { timestamp: i64, now: i64 },

    #[error("Webhook signing secret is unusable")]
    InvalidSecret,

    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

/// Verify a `Stripe-Signature` header against the raw request body.
///
/// `tolerance_secs` bounds how old the signed timestamp may be; 0 disables
/// the freshness check.
pub fn verify_header(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_secs: u64,
) -> Result<(), SignatureError> {
    verify_header_at(payload, header, secret, tolerance_secs, unix_now())
}

/// Same as [`verify_header`] with an explicit current time.
pub fn verify_header_at(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_secs: u64,
    now: i64,
) -> Result<(), SignatureError> {
    let (timestamp, signatures) = parse_header(header)?;

    let expected = compute_signature(secret, timestamp, payload)?;

    if !signatures
        .iter()
        .any(|sig| constant_time_compare(&expected, sig))
    {
        warn!(
            timestamp = timestamp,
            candidate_count = signatures.len(),
            "stripe_signature_mismatch"
        );
        return Err(SignatureError::NoMatchingSignature);
    }

    // Future timestamps are accepted; only stale deliveries are rejected.
    let age = now.saturating_sub(timestamp);
    if tolerance_secs > 0 && age > i64::try_from(tolerance_secs).unwrap_or(i64::MAX) {
        warn!(
            timestamp = timestamp,
            current_time = now,
            age_seconds = age,
            max_age_seconds = tolerance_secs,
            "stripe_signature_stale"
        );
        return Err(SignatureError::TimestampOutsideTolerance { timestamp, now });
    }

    Ok(())
}

/// Compute the hex `v1` signature for a payload signed at `timestamp`.
pub fn compute_signature(
    secret: &str,
    timestamp: i64,
    payload: &[u8],
) -> Result<String, SignatureError> {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            warn!("stripe_signature_invalid_key");
            return Err(SignatureError::InvalidSecret);
        }
    };

    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);

    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Build a header value the way Stripe would for this payload.
///
/// Useful for tests and for replaying captured payloads locally.
pub fn generate_header(
    secret: &str,
    timestamp: i64,
    payload: &[u8],
) -> Result<String, SignatureError> {
    Ok(format!(
        "t={},{}={}",
        timestamp,
        EXPECTED_SCHEME,
        compute_signature(secret, timestamp, payload)?
    ))
}

/// Split the header into its timestamp and the `v1` signatures it carries.
///
/// Unknown schemes (e.g. `v0`) are ignored.
fn parse_header(header: &str) -> Result<(i64, Vec<&str>), SignatureError> {
    let mut timestamp: Option<i64> = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let mut kv = part.trim().splitn(2, '=');
        match (kv.next(), kv.next()) {
            (Some("t"), Some(ts)) => timestamp = ts.parse().ok(),
            (Some(EXPECTED_SCHEME), Some(sig)) => signatures.push(sig),
            _ => {}
        }
    }

    let timestamp = match timestamp {
        Some(t) => t,
        None => {
            warn!("stripe_signature_header_malformed");
            return Err(SignatureError::MalformedHeader);
        }
    };

    if signatures.is_empty() {
        warn!(timestamp = timestamp, "stripe_signature_no_v1");
        return Err(SignatureError::NoExpectedScheme);
    }

    Ok((timestamp, signatures))
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}
