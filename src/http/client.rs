//! HTTP client setup and middleware configuration.
//!
//! The downloader uses two clients built from the same configuration:
//!
//! - the probe client retries transient failures through
//!   `RetryTransientMiddleware`;
//! - the transfer client has no retry middleware, since segment workers count
//!   their own attempts against the request's retry budget.
//!
//! Both trace every request through `TracingMiddleware`.
//!
//! # Examples
//!
//! ```rust
//! use segdl::http::{create_http_client, HttpClientConfig};
//! use reqwest::header::{HeaderMap, USER_AGENT};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut headers = HeaderMap::new();
//! headers.insert(USER_AGENT, "MyDownloader/1.0".parse()?);
//!
//! let config = HttpClientConfig {
//!     retries: 5,
//!     headers: Some(headers),
//!     ..HttpClientConfig::default()
//! };
//!
//! let client = create_http_client(config)?;
//! # Ok(())
//! # }
//! ```

use crate::retry::{DEFAULT_MAX_RETRY_INTERVAL, DEFAULT_MIN_RETRY_INTERVAL};

use reqwest::{header::HeaderMap, redirect, Proxy};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, Jitter, RetryTransientMiddleware};
use reqwest_tracing::TracingMiddleware;
use std::time::Duration;

/// Default connection timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default maximum number of redirects followed.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Configuration for HTTP client setup.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Number of transparent retries for transient failures. `0` disables the
    /// retry middleware.
    pub retries: u32,
    /// Optional proxy configuration.
    pub proxy: Option<Proxy>,
    /// Default headers to include with all requests.
    pub headers: Option<HeaderMap>,
    /// Timeout for establishing a connection.
    pub connect_timeout: Duration,
    /// Timeout for a whole request, body included. `None` means no limit.
    pub timeout: Option<Duration>,
    /// Maximum number of redirects to follow.
    pub max_redirects: usize,
    /// Lower bound of the retry middleware backoff.
    pub min_retry_interval: Duration,
    /// Upper bound of the retry middleware backoff.
    pub max_retry_interval: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            retries: 3,
            proxy: None,
            headers: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            timeout: None,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            min_retry_interval: DEFAULT_MIN_RETRY_INTERVAL,
            max_retry_interval: DEFAULT_MAX_RETRY_INTERVAL,
        }
    }
}

/// Creates an HTTP client with middleware configuration.
///
/// This function sets up a reqwest client with:
/// - Tracing middleware for request/response logging
/// - Retry middleware with jittered exponential backoff, when `retries > 0`
/// - Connection timeout, optional request timeout and a redirect limit
/// - Optional proxy support and default headers
pub fn create_http_client(
    config: HttpClientConfig,
) -> Result<ClientWithMiddleware, reqwest::Error> {
    let mut inner_client_builder = reqwest::Client::builder()
        .connect_timeout(config.connect_timeout)
        .redirect(redirect::Policy::limited(config.max_redirects));

    if let Some(timeout) = config.timeout {
        inner_client_builder = inner_client_builder.timeout(timeout);
    }

    if let Some(proxy) = config.proxy {
        inner_client_builder = inner_client_builder.proxy(proxy);
    }

    if let Some(headers) = config.headers {
        inner_client_builder = inner_client_builder.default_headers(headers);
    }

    let inner_client = inner_client_builder.build()?;

    // Trace HTTP requests. See the tracing crate to make use of these traces.
    let mut builder = ClientBuilder::new(inner_client).with(TracingMiddleware::default());

    if config.retries > 0 {
        let min = config.min_retry_interval.min(config.max_retry_interval);
        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(min, config.max_retry_interval)
            .jitter(Jitter::Bounded)
            .build_with_max_retries(config.retries);
        builder = builder.with(RetryTransientMiddleware::new_with_policy(retry_policy));
    }

    Ok(builder.build())
}
