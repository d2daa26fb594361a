//! Builder pattern implementation for creating Downloader instances.
//!
//! # Examples
//!
//! ```rust
//! use segdl::downloader::DownloaderBuilder;
//! use std::path::PathBuf;
//! use std::time::Duration;
//!
//! let downloader = DownloaderBuilder::new()
//!     .directory(PathBuf::from("./downloads"))
//!     .retry_interval(Duration::from_millis(200), Duration::from_secs(5))
//!     .build();
//! ```
//!
//! ## Hidden Progress Bars
//!
//! ```rust
//! use segdl::downloader::DownloaderBuilder;
//!
//! let downloader = DownloaderBuilder::hidden().build();
//! ```

use super::{
    config::{DownloaderConfig, SegmentCallback},
    downloader::Downloader,
};
use crate::http::ProbeMethod;
use crate::segment::Segment;
use crate::StyleOptions;

use reqwest::header::{HeaderMap, HeaderValue, IntoHeaderName};
use std::{path::PathBuf, sync::Arc, time::Duration};

/// A builder used to create a [`Downloader`].
///
/// ```rust
/// # fn main()  {
/// use segdl::downloader::DownloaderBuilder;
///
/// let d = DownloaderBuilder::new().directory("downloads".into()).build();
/// # }
/// ```
#[derive(Default)]
pub struct DownloaderBuilder {
    config: DownloaderConfig,
}

impl DownloaderBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        DownloaderBuilder::default()
    }

    /// Convenience function to hide the progress bars.
    pub fn hidden() -> Self {
        let mut builder = DownloaderBuilder::default();
        builder.config.style_options = StyleOptions::hidden();
        builder
    }

    /// Sets the directory where to store the downloads.
    pub fn directory(mut self, directory: PathBuf) -> Self {
        self.config.directory = directory;
        self
    }

    /// Set the downloader style options.
    pub fn style_options(mut self, style_options: StyleOptions) -> Self {
        self.config.style_options = style_options;
        self
    }

    /// Use a one-byte range request instead of `HEAD` for the metadata probe.
    ///
    /// This is useful when servers don't provide accurate headers in `HEAD`
    /// responses but do answer range requests with a `Content-Range`.
    pub fn use_range_for_content_length(mut self, use_range: bool) -> Self {
        self.config.probe_method = if use_range {
            ProbeMethod::RangeGet
        } else {
            ProbeMethod::Head
        };
        self
    }

    /// Set how many times the metadata probe is transparently retried.
    pub fn probe_retries(mut self, retries: u32) -> Self {
        self.config.probe_retries = retries;
        self
    }

    /// Set the bounds of the delay between two attempts.
    pub fn retry_interval(mut self, min: Duration, max: Duration) -> Self {
        self.config.min_retry_interval = min;
        self.config.max_retry_interval = max;
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Limit the duration of every request, body included.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Set the maximum number of redirects to follow.
    pub fn max_redirects(mut self, max_redirects: usize) -> Self {
        self.config.max_redirects = max_redirects;
        self
    }

    /// Route requests through a proxy.
    pub fn proxy(mut self, proxy: reqwest::Proxy) -> Self {
        self.config.proxy = Some(proxy);
        self
    }

    /// Set callback for when each segment completes.
    ///
    /// The callback runs as soon as a segment is fully written, while other
    /// segments may still be in flight. It is not called on the serial path.
    pub fn on_segment_complete<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Segment) + Send + Sync + 'static,
    {
        let callback: SegmentCallback = Box::new(callback);
        self.config.on_segment_complete = Some(Arc::new(callback));
        self
    }

    /// Helper method to get or create a new HeaderMap.
    fn new_header(&self) -> HeaderMap {
        match self.config.headers {
            Some(ref h) => h.to_owned(),
            _ => HeaderMap::new(),
        }
    }

    /// Add the http headers.
    ///
    /// You can call `.headers()` multiple times and all `HeaderMap` will be
    /// merged into a single one.
    ///
    /// # Example
    ///
    /// ```
    /// use reqwest::header::{self, HeaderValue, HeaderMap};
    /// use segdl::downloader::DownloaderBuilder;
    ///
    /// let ua = HeaderValue::from_str("curl/7.87").expect("Invalid UA");
    ///
    /// let downloader = DownloaderBuilder::new()
    ///     .headers(HeaderMap::from_iter([(header::USER_AGENT, ua)]))
    ///     .build();
    /// ```
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        let mut new = self.new_header();
        new.extend(headers);

        self.config.headers = Some(new);
        self
    }

    /// Add the http header
    ///
    /// See also [`headers()`].
    ///
    /// [`headers()`]: DownloaderBuilder::headers
    pub fn header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        let mut new = self.new_header();

        new.insert(name, value);

        self.config.headers = Some(new);
        self
    }

    /// Create the [`Downloader`] with the specified options.
    pub fn build(self) -> Downloader {
        Downloader::new(self.config)
    }
}
