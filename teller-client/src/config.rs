//! Configuration module for environment variable parsing.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::api::{CertificatePaths, ClientConfig, DEFAULT_BASE_URL};
use crate::webhook::{Tolerance, DEFAULT_MAX_AGE};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the webhook receiver to listen on
    pub port: u16,

    /// Active webhook signing secrets, from the Teller dashboard
    pub signing_secrets: Vec<String>,

    /// Maximum age in seconds for webhook signature timestamps
    pub webhook_max_age: u64,

    /// Optional limit in seconds on how far in the future a timestamp may be
    pub webhook_max_future_skew: Option<u64>,

    /// Teller API base URL
    pub api_url: String,

    /// Default access token for API calls
    pub access_token: Option<String>,

    /// PEM client certificate path for mutual TLS
    pub cert_path: Option<PathBuf>,

    /// PEM private key path for mutual TLS
    pub key_path: Option<PathBuf>,

    /// HTTP request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            port: parse_number("PORT", 8080),

            signing_secrets: parse_csv("TELLER_SIGNING_SECRETS").unwrap_or_default(),

            webhook_max_age: parse_number("TELLER_WEBHOOK_TOLERANCE_SECS", DEFAULT_MAX_AGE.as_secs()),

            webhook_max_future_skew: env::var("TELLER_WEBHOOK_MAX_FUTURE_SKEW_SECS")
                .ok()
                .and_then(|raw| match raw.trim().parse() {
                    Ok(v) => Some(v),
                    Err(_) => {
                        warn!(
                            env_var = "TELLER_WEBHOOK_MAX_FUTURE_SKEW_SECS",
                            value = %raw,
                            "Invalid number, future skew limit disabled"
                        );
                        None
                    }
                }),

            api_url: env::var("TELLER_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),

            access_token: non_empty("TELLER_ACCESS_TOKEN"),

            cert_path: non_empty("TELLER_CERT_PATH").map(PathBuf::from),

            key_path: non_empty("TELLER_KEY_PATH").map(PathBuf::from),

            request_timeout_ms: parse_number("REQUEST_TIMEOUT_MS", 30_000),
        }
    }

    /// Freshness window for webhook verification.
    pub fn tolerance(&self) -> Tolerance {
        let tolerance = Tolerance::max_age(Duration::from_secs(self.webhook_max_age));
        match self.webhook_max_future_skew {
            Some(skew) => tolerance.with_max_future_skew(Duration::from_secs(skew)),
            None => tolerance,
        }
    }

    /// API client settings. A certificate is only used when both paths are set.
    pub fn client_config(&self) -> ClientConfig {
        let certificate = match (&self.cert_path, &self.key_path) {
            (Some(cert), Some(key)) => Some(CertificatePaths {
                cert: cert.clone(),
                key: key.clone(),
            }),
            (None, None) => None,
            _ => {
                warn!("Only one of TELLER_CERT_PATH and TELLER_KEY_PATH is set, ignoring certificate");
                None
            }
        };

        ClientConfig {
            base_url: self.api_url.clone(),
            access_token: self.access_token.clone(),
            certificate,
            timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }
}

/// Parse a numeric variable, warning and falling back on bad input.
fn parse_number<T: std::str::FromStr>(name: &str, default: T) -> T {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid number, using default");
            default
        }
    }
}

/// Read a variable, treating blank values as unset.
fn non_empty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a comma-separated list of strings.
fn parse_csv(name: &str) -> Option<Vec<String>> {
    env::var(name).ok().map(|raw| {
        raw.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}
