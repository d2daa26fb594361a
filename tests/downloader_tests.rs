//! Tests for the downloader module configuration surface:
//! - DownloaderBuilder pattern
//! - Downloader getters
//! - HttpClientConfig derivation

use segdl::downloader::DownloaderBuilder;
use segdl::http::client::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_MAX_REDIRECTS};
use segdl::retry::{DEFAULT_MAX_RETRY_INTERVAL, DEFAULT_MIN_RETRY_INTERVAL};
use segdl::ProbeMethod;

use reqwest::header::{HeaderValue, USER_AGENT};
use std::time::Duration;

mod common;
use common::helpers::*;

#[test]
fn test_builder_defaults() {
    let downloader = DownloaderBuilder::new().build();
    let config = downloader.config();

    assert!(!downloader.use_range_for_content_length());
    assert!(downloader.headers().is_none());
    assert_eq!(config.probe_retries, 3);
    assert_eq!(config.min_retry_interval, DEFAULT_MIN_RETRY_INTERVAL);
    assert_eq!(config.max_retry_interval, DEFAULT_MAX_RETRY_INTERVAL);
    assert_eq!(config.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
    assert_eq!(config.max_redirects, DEFAULT_MAX_REDIRECTS);
    assert!(config.timeout.is_none());
    assert!(config.on_segment_complete.is_none());
}

#[test]
fn test_builder_configuration() {
    let temp_dir = create_temp_dir();
    let downloader = DownloaderBuilder::new()
        .directory(temp_dir.path().to_path_buf())
        .use_range_for_content_length(true)
        .probe_retries(1)
        .retry_interval(Duration::from_millis(10), Duration::from_millis(20))
        .connect_timeout(Duration::from_secs(3))
        .timeout(Duration::from_secs(60))
        .max_redirects(2)
        .build();
    let config = downloader.config();

    assert_eq!(downloader.directory(), temp_dir.path());
    assert!(downloader.use_range_for_content_length());
    assert_eq!(config.probe_method, ProbeMethod::RangeGet);
    assert_eq!(config.probe_retries, 1);
    assert_eq!(config.min_retry_interval, Duration::from_millis(10));
    assert_eq!(config.max_retry_interval, Duration::from_millis(20));
    assert_eq!(config.connect_timeout, Duration::from_secs(3));
    assert_eq!(config.timeout, Some(Duration::from_secs(60)));
    assert_eq!(config.max_redirects, 2);
}

#[test]
fn test_builder_headers() {
    let downloader = DownloaderBuilder::new()
        .headers(create_test_headers())
        .build();

    assert_eq!(
        downloader.headers().unwrap().get(USER_AGENT),
        Some(&HeaderValue::from_static(TEST_USER_AGENT))
    );
}

#[test]
fn test_builder_single_header_overrides() {
    let downloader = DownloaderBuilder::new()
        .headers(create_test_headers())
        .header(USER_AGENT, HeaderValue::from_static("single-test-agent"))
        .build();

    assert_eq!(
        downloader.headers().unwrap().get(USER_AGENT),
        Some(&HeaderValue::from_static("single-test-agent"))
    );
}

#[test]
fn test_builder_hidden() {
    let downloader = DownloaderBuilder::hidden().build();
    assert!(!downloader.config().style_options.is_enabled());
}

#[test]
fn test_downloader_debug_and_clone() {
    let downloader = DownloaderBuilder::new()
        .on_segment_complete(|_| {})
        .build();
    let cloned = downloader.clone();
    let debug_str = format!("{:?}", cloned);

    assert!(debug_str.contains("Downloader"));
    assert!(debug_str.contains("on_segment_complete: true"));
    assert_eq!(downloader.directory(), cloned.directory());
}

#[test]
fn test_http_client_config_from_downloader() {
    let downloader = DownloaderBuilder::new()
        .headers(create_test_headers())
        .max_redirects(1)
        .build();
    let http = downloader.config().http_client_config(0);

    assert_eq!(http.retries, 0);
    assert_eq!(http.max_redirects, 1);
    assert!(http.proxy.is_none());
    assert!(http.headers.is_some());
}
