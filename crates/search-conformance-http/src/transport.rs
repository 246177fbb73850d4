// crates/search-conformance-http/src/transport.rs
// ============================================================================
// Module: HTTP Search Transport
// Description: Bounded GET transport against a remote search endpoint.
// Purpose: Send one query per call and return status, body, and page.
// Dependencies: search-conformance-core, reqwest, url, tracing
// ============================================================================

//! ## Overview
//! [`HttpSearchTransport`] issues `GET {endpoint}?{param}={text}` with the
//! text URL-encoded, redirects disabled, a client-level timeout, and a hard
//! cap on the response body. Success bodies are decoded into a
//! [`search_conformance_core::ResultPage`]; other statuses come back with the
//! raw body and no page so the runner can judge them against the scenario.
//! The transport holds no per-query state and is shared behind an `Arc`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::Response;
use reqwest::redirect::Policy;
use search_conformance_core::Query;
use search_conformance_core::SearchResponse;
use search_conformance_core::SearchTransport;
use search_conformance_core::TransportError;
use search_conformance_core::catalog::MAX_REQUEST_URI_BYTES;
use tracing::debug;
use url::Url;

use crate::wire::decode_page;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default query parameter name.
pub const DEFAULT_QUERY_PARAM: &str = "text";
/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default response body limit in bytes.
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 8 * 1024 * 1024;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for [`HttpSearchTransport`].
///
/// # Invariants
/// - `endpoint` has already passed scheme and credential checks.
/// - `max_response_bytes` is a hard upper bound on response bodies.
/// - `timeout` applies to the full request lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpTransportConfig {
    /// Search endpoint.
    pub endpoint: Url,
    /// Query parameter carrying the query text.
    pub query_param: String,
    /// User agent string for outbound requests.
    pub user_agent: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum response size allowed, in bytes.
    pub max_response_bytes: usize,
}

impl HttpTransportConfig {
    /// Creates a configuration for `endpoint` with default limits.
    #[must_use]
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            query_param: DEFAULT_QUERY_PARAM.to_string(),
            user_agent: format!("search-conformance/{}", env!("CARGO_PKG_VERSION")),
            timeout: DEFAULT_TIMEOUT,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }
}

// ============================================================================
// SECTION: Transport
// ============================================================================

/// Search transport over HTTP.
///
/// # Invariants
/// - Request URIs longer than [`MAX_REQUEST_URI_BYTES`] are refused before sending.
/// - Redirects are not followed.
/// - Bodies exceeding the configured limit fail closed.
#[derive(Debug, Clone)]
pub struct HttpSearchTransport {
    /// Transport configuration.
    config: HttpTransportConfig,
    /// HTTP client used for outbound requests.
    client: Client,
}

impl HttpSearchTransport {
    /// Creates a transport with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Request`] when the HTTP client cannot be built.
    pub fn new(config: HttpTransportConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|err| TransportError::Request(format!("http client build failed: {err}")))?;
        Ok(Self {
            config,
            client,
        })
    }

    /// Returns the transport configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpTransportConfig {
        &self.config
    }

    /// Builds the request URL for a query; empty queries omit the parameter.
    #[must_use]
    pub fn request_url(&self, query: &Query) -> Url {
        let mut url = self.config.endpoint.clone();
        if !query.is_empty() {
            url.query_pairs_mut().append_pair(&self.config.query_param, query.text());
        }
        url
    }

    /// Reads the body while enforcing the byte limit.
    async fn read_body(
        &self,
        mut response: Response,
        started: Instant,
    ) -> Result<Vec<u8>, TransportError> {
        let limit = self.config.max_response_bytes;
        let limit_u64 = u64::try_from(limit)
            .map_err(|_| TransportError::Request("response size limit exceeds u64".to_string()))?;
        if response.content_length().is_some_and(|expected| expected > limit_u64) {
            return Err(TransportError::BodyTooLarge {
                limit,
            });
        }
        let mut body = Vec::new();
        while let Some(chunk) =
            response.chunk().await.map_err(|err| map_reqwest_error(err, started))?
        {
            if body.len().saturating_add(chunk.len()) > limit {
                return Err(TransportError::BodyTooLarge {
                    limit,
                });
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

#[async_trait]
impl SearchTransport for HttpSearchTransport {
    async fn search(&self, query: &Query) -> Result<SearchResponse, TransportError> {
        let url = self.request_url(query);
        let uri_bytes = url.as_str().len();
        if uri_bytes > MAX_REQUEST_URI_BYTES {
            return Err(TransportError::Request(format!(
                "request URI is {uri_bytes} bytes, above the {MAX_REQUEST_URI_BYTES} byte limit"
            )));
        }
        let started = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| map_reqwest_error(err, started))?;
        let status = response.status().as_u16();
        let body = self.read_body(response, started).await?;
        debug!(
            feature = %query.feature(),
            status,
            bytes = body.len(),
            elapsed_ms = elapsed_ms(started),
            "search response received"
        );
        let page = if (200 .. 300).contains(&status) { Some(decode_page(&body)?) } else { None };
        Ok(SearchResponse {
            status,
            body: String::from_utf8_lossy(&body).into_owned(),
            page,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Maps a client error onto the transport taxonomy without echoing the URL.
fn map_reqwest_error(err: reqwest::Error, started: Instant) -> TransportError {
    if err.is_timeout() {
        return TransportError::Timeout {
            elapsed_ms: elapsed_ms(started),
        };
    }
    let connect = err.is_connect();
    let message = err.without_url().to_string();
    if connect { TransportError::Connect(message) } else { TransportError::Request(message) }
}

/// Milliseconds elapsed since `started`, saturating.
fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
