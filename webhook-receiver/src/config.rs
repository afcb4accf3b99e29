//! Configuration module for environment variable parsing.
//!
//! Both Stripe secrets are required: the process refuses to start without
//! them rather than failing every request later.

use std::env;
use std::fmt;

use thiserror::Error;
use tracing::warn;

/// Default freshness window for signed webhook timestamps, in seconds.
pub const DEFAULT_SIGNATURE_TOLERANCE_SECS: u64 = 300;

/// Errors raised while loading configuration at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),
}

/// Application configuration loaded from environment variables.
///
/// Built once in `main` and shared read-only with every request.
#[derive(Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Stripe API secret key
    pub stripe_secret_key: String,

    /// Signing secret for the webhook endpoint (`whsec_...`)
    pub stripe_webhook_secret: String,

    /// Maximum age in seconds of a signed timestamp; 0 disables the check
    pub signature_tolerance_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Config {
            port: parse_or("PORT", 8080),

            stripe_secret_key: required("STRIPE_SECRET_KEY")?,

            stripe_webhook_secret: required("STRIPE_WEBHOOK_SECRET")?,

            signature_tolerance_secs: parse_or(
                "STRIPE_WEBHOOK_TOLERANCE_SECS",
                DEFAULT_SIGNATURE_TOLERANCE_SECS,
            ),
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("stripe_secret_key", &"<redacted>")
            .field("stripe_webhook_secret", &"<redacted>")
            .field("signature_tolerance_secs", &self.signature_tolerance_secs)
            .finish()
    }
}

/// Read a variable that must be present and non-blank.
fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(name)),
    }
}

/// Parse an optional variable, falling back to `default` when unset or invalid.
fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid value, using default");
            default
        }
    }
}
