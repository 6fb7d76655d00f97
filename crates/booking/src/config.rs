//! Booking service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BOOKING_BASE_URL` - Public URL for the booking service
//! - `BOOKING_SESSION_SECRET` - Session signing secret (min 32 chars, high entropy)
//! - `SCHEDULING_API_URL` - Base URL of the scheduling backend (services, stylists, confirmation)
//! - `SCHEDULING_API_KEY` - API key for the scheduling backend
//! - `PAYMENTS_API_URL` - Base URL of the payment provider's intent endpoint
//! - `PAYMENTS_SECRET_KEY` - Payment provider secret key (server-side only)
//! - `PAYMENTS_PUBLISHABLE_KEY` - Payment provider publishable key (safe for browsers)
//!
//! ## Optional
//! - `BOOKING_HOST` - Bind address (default: 127.0.0.1)
//! - `BOOKING_PORT` - Listen port (default: 3000)
//! - `BOOKING_SHORT_PATH_PROGRESS` - Compute progress over the cash short path (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry trace sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use marigold_core::WizardOptions;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Booking service configuration.
#[derive(Debug, Clone)]
pub struct BookingConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the booking service
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Scheduling backend (catalog reads + booking confirmation)
    pub scheduling: SchedulingConfig,
    /// Payment provider configuration
    pub payments: PaymentsConfig,
    /// Wizard behavior toggles
    pub wizard: WizardOptions,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag (e.g. production, staging)
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry trace sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Scheduling backend configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct SchedulingConfig {
    /// Base URL for the scheduling API
    pub base_url: Url,
    /// API key sent on every request (server-side only)
    pub api_key: SecretString,
}

impl std::fmt::Debug for SchedulingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulingConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Payment provider configuration.
///
/// Implements `Debug` manually to redact the secret key.
#[derive(Clone)]
pub struct PaymentsConfig {
    /// Base URL for the payment provider API
    pub base_url: Url,
    /// Secret key for server-side calls
    pub secret_key: SecretString,
    /// Publishable key handed to the browser SDK
    pub publishable_key: String,
}

impl std::fmt::Debug for PaymentsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentsConfig")
            .field("base_url", &self.base_url.as_str())
            .field("secret_key", &"[REDACTED]")
            .field("publishable_key", &self.publishable_key)
            .finish()
    }
}

impl BookingConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("BOOKING_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("BOOKING_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("BOOKING_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("BOOKING_PORT".to_string(), e.to_string()))?;
        let base_url = get_required_env("BOOKING_BASE_URL")?;
        let session_secret = get_validated_secret("BOOKING_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "BOOKING_SESSION_SECRET")?;

        let scheduling = SchedulingConfig::from_env()?;
        let payments = PaymentsConfig::from_env()?;

        let wizard = WizardOptions {
            short_path_progress: get_env_or_default("BOOKING_SHORT_PATH_PROGRESS", "false")
                .parse::<bool>()
                .map_err(|e| {
                    ConfigError::InvalidEnvVar(
                        "BOOKING_SHORT_PATH_PROGRESS".to_string(),
                        e.to_string(),
                    )
                })?,
        };

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_env_or_default("SENTRY_SAMPLE_RATE", "1.0")
            .parse::<f32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SENTRY_SAMPLE_RATE".to_string(), e.to_string())
            })?;
        let sentry_traces_sample_rate = get_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0")
            .parse::<f32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SENTRY_TRACES_SAMPLE_RATE".to_string(), e.to_string())
            })?;

        Ok(Self {
            host,
            port,
            base_url,
            session_secret,
            scheduling,
            payments,
            wizard,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl SchedulingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: get_url("SCHEDULING_API_URL")?,
            api_key: get_validated_secret("SCHEDULING_API_KEY")?,
        })
    }
}

impl PaymentsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: get_url("PAYMENTS_API_URL")?,
            secret_key: get_validated_secret("PAYMENTS_SECRET_KEY")?,
            publishable_key: get_required_env("PAYMENTS_PUBLISHABLE_KEY")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a required environment variable parsed as a URL.
fn get_url(key: &str) -> Result<Url, ConfigError> {
    let raw = get_required_env(key)?;
    Url::parse(&raw).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Real API keys and signing secrets have high entropy
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
