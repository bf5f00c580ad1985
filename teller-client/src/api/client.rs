//! HTTP client for the Teller API.
//!
//! Teller authenticates applications with a mutual TLS client certificate and
//! users with an access token sent as the HTTP Basic username (empty
//! password). The sandbox environment accepts requests without a certificate.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::{Identity, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{info, warn};
use url::Url;

use super::{AccountModule, IdentityModule, InstitutionsModule, TransactionModule};
use crate::error::{ApiError, ApiResult};

/// Production API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.teller.io";

/// Paths to the PEM encoded client certificate and private key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificatePaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Configuration for [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL; may carry a path prefix, with or without a trailing slash
    pub base_url: String,
    /// Access token used when a call does not supply its own
    pub access_token: Option<String>,
    /// Client certificate for mutual TLS
    pub certificate: Option<CertificatePaths>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: None,
            certificate: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Per-call options.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Overrides the client-wide access token for this call
    pub access_token: Option<String>,
}

impl RequestOptions {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            access_token: Some(token.into()),
        }
    }
}

/// Error body returned by the Teller API.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Teller API client.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    access_token: Option<String>,
}

impl ApiClient {
    /// Create a client, loading the client certificate if one is configured.
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let mut builder = reqwest::Client::builder().timeout(config.timeout);

        if let Some(paths) = &config.certificate {
            builder = builder.identity(load_identity(paths)?);
        }

        let http = builder.build()?;

        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }

        info!(
            base_url = %config.base_url,
            has_certificate = config.certificate.is_some(),
            has_access_token = config.access_token.is_some(),
            "teller_client_created"
        );

        Ok(Self {
            http,
            base_url,
            access_token: config.access_token.filter(|t| !t.is_empty()),
        })
    }

    /// Create a client for the production API with no certificate or token.
    pub fn with_defaults() -> ApiResult<Self> {
        Self::new(ClientConfig::default())
    }

    pub fn accounts(&self) -> AccountModule<'_> {
        AccountModule::new(self)
    }

    pub fn transactions(&self) -> TransactionModule<'_> {
        TransactionModule::new(self)
    }

    pub fn identity(&self) -> IdentityModule<'_> {
        IdentityModule::new(self)
    }

    pub fn institutions(&self) -> InstitutionsModule<'_> {
        InstitutionsModule::new(self)
    }

    /// Build a request for the path made of `segments`, attaching query
    /// parameters and credentials.
    ///
    /// Each segment is percent-encoded, so ids containing `/`, `?` or `#`
    /// stay inside their own segment. A non-empty per-call token wins over
    /// the client token. Pass `None` for `options` and `authenticate = false`
    /// for public endpoints.
    pub(crate) fn request(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, String)],
        options: Option<&RequestOptions>,
        authenticate: bool,
    ) -> ApiResult<RequestBuilder> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        let mut request = self.http.request(method, url);

        if authenticate {
            if let Some(token) = self.token_for(options) {
                request = request.basic_auth(token, None::<&str>);
            }
        }

        Ok(request)
    }

    fn token_for<'a>(&'a self, options: Option<&'a RequestOptions>) -> Option<&'a str> {
        options
            .and_then(|o| o.access_token.as_deref())
            .filter(|t| !t.is_empty())
            .or(self.access_token.as_deref())
    }

    /// Send a request and decode a JSON response.
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let body = self.send(request).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Send a request whose response body is not needed.
    pub(crate) async fn send_empty(&self, request: RequestBuilder) -> ApiResult<()> {
        self.send(request).await.map(|_| ())
    }

    async fn send(&self, request: RequestBuilder) -> ApiResult<Vec<u8>> {
        let response = request.send().await.inspect_err(|e| {
            if e.is_timeout() {
                warn!(error = %e, "teller_api_timeout");
            } else {
                warn!(error = %e, "teller_api_request_error");
            }
        })?;

        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.bytes().await?;

        info!(
            path = %url,
            status_code = status.as_u16(),
            body_length = body.len(),
            "teller_api_response"
        );

        if !status.is_success() {
            let message = error_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
            warn!(
                path = %url,
                status_code = status.as_u16(),
                message = %message,
                "teller_api_error_status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body.to_vec())
    }
}

/// Read the certificate and key into a single PEM identity.
fn load_identity(paths: &CertificatePaths) -> ApiResult<Identity> {
    let mut pem = std::fs::read(&paths.cert).map_err(|e| {
        ApiError::Certificate(format!("reading {}: {e}", paths.cert.display()))
    })?;
    let key = std::fs::read(&paths.key).map_err(|e| {
        ApiError::Certificate(format!("reading {}: {e}", paths.key.display()))
    })?;

    if !pem.ends_with(b"\n") {
        pem.push(b'\n');
    }
    pem.extend_from_slice(&key);

    Identity::from_pem(&pem).map_err(|e| ApiError::Certificate(e.to_string()))
}

/// Pull a readable message out of a Teller error body.
fn error_message(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    match (parsed.error.code, parsed.error.message) {
        (Some(code), Some(message)) => Some(format!("{code}: {message}")),
        (None, Some(message)) => Some(message),
        (Some(code), None) => Some(code),
        (None, None) => None,
    }
}
