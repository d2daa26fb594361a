//! Configuration structures and defaults for the downloader.
//!
//! [`DownloaderConfig`] holds everything that is not specific to one
//! [`DownloadRequest`](crate::download::DownloadRequest): where files go, how
//! the HTTP client behaves, how long to wait between attempts and how progress
//! is shown.
//!
//! # Examples
//!
//! ```rust
//! use segdl::downloader::SegmentCallback;
//! use segdl::segment::Segment;
//!
//! let callback: SegmentCallback = Box::new(|segment: &Segment| {
//!     println!("{} done after {} failed attempts", segment, segment.attempts);
//! });
//! ```

use crate::http::client::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_MAX_REDIRECTS};
use crate::http::{HttpClientConfig, ProbeMethod};
use crate::retry::{DEFAULT_MAX_RETRY_INTERVAL, DEFAULT_MIN_RETRY_INTERVAL};
use crate::segment::Segment;
use crate::StyleOptions;

use reqwest::header::HeaderMap;
use std::env::current_dir;
use std::sync::Arc;
use std::time::Duration;

/// Callback type for segment completion events.
pub type SegmentCallback = Box<dyn Fn(&Segment) + Send + Sync>;

/// Configuration structure for the downloader
#[derive(Clone)]
pub struct DownloaderConfig {
    /// Directory where to store the downloaded files.
    pub directory: std::path::PathBuf,
    /// Downloader style options.
    pub style_options: StyleOptions,
    /// Custom HTTP headers.
    pub headers: Option<HeaderMap>,
    /// Optional proxy configuration.
    pub proxy: Option<reqwest::Proxy>,
    /// How the metadata probe is issued.
    pub probe_method: ProbeMethod,
    /// Transparent retries of the metadata probe.
    pub probe_retries: u32,
    /// Lower bound of the delay between attempts.
    pub min_retry_interval: Duration,
    /// Upper bound of the delay between attempts.
    pub max_retry_interval: Duration,
    /// Timeout for establishing a connection.
    pub connect_timeout: Duration,
    /// Timeout for a whole request, body included.
    pub timeout: Option<Duration>,
    /// Maximum number of redirects to follow.
    pub max_redirects: usize,
    /// Callback for when each segment completes.
    pub on_segment_complete: Option<Arc<SegmentCallback>>,
}

impl DownloaderConfig {
    /// HTTP client settings derived from this configuration.
    pub fn http_client_config(&self, retries: u32) -> HttpClientConfig {
        HttpClientConfig {
            retries,
            proxy: self.proxy.clone(),
            headers: self.headers.clone(),
            connect_timeout: self.connect_timeout,
            timeout: self.timeout,
            max_redirects: self.max_redirects,
            min_retry_interval: self.min_retry_interval,
            max_retry_interval: self.max_retry_interval,
        }
    }
}

impl std::fmt::Debug for DownloaderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloaderConfig")
            .field("directory", &self.directory)
            .field("style_options", &self.style_options)
            .field("headers", &self.headers)
            .field("proxy", &self.proxy)
            .field("probe_method", &self.probe_method)
            .field("probe_retries", &self.probe_retries)
            .field("min_retry_interval", &self.min_retry_interval)
            .field("max_retry_interval", &self.max_retry_interval)
            .field("connect_timeout", &self.connect_timeout)
            .field("timeout", &self.timeout)
            .field("max_redirects", &self.max_redirects)
            .field("on_segment_complete", &self.on_segment_complete.is_some())
            .finish()
    }
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            directory: current_dir().unwrap_or_default(),
            style_options: StyleOptions::default(),
            headers: None,
            proxy: None,
            probe_method: ProbeMethod::Head,
            probe_retries: 3,
            min_retry_interval: DEFAULT_MIN_RETRY_INTERVAL,
            max_retry_interval: DEFAULT_MAX_RETRY_INTERVAL,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            timeout: None,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            on_segment_complete: None,
        }
    }
}
