use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use segdl::download::DownloadRequest;
use segdl::DownloaderBuilder;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

// Common test constants
pub const TEST_DOMAIN: &str = "http://domain.com/file.zip";
pub const TEST_USER_AGENT: &str = "segdl-test-agent";

/// Creates a temporary directory for testing purposes
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Creates random test content of the given size
pub fn create_test_content(size: usize) -> Vec<u8> {
    let mut rng = rand::rng();
    (0..size).map(|_| rng.random::<u8>()).collect()
}

/// Asserts that `path` holds exactly `expected`
pub fn assert_file_content(path: &Path, expected: &[u8]) {
    let actual = fs::read(path).unwrap_or_else(|e| panic!("cannot read {:?}: {}", path, e));
    assert_eq!(actual.len(), expected.len(), "File size mismatch at path: {:?}", path);
    assert!(actual == expected, "File content mismatch at path: {:?}", path);
}

/// Asserts that neither the file nor its temporary file exist
pub fn assert_no_output(dir: &Path, filename: &str) {
    assert!(!dir.join(filename).exists(), "{} should not exist", filename);
    let part = format!("{}.part", filename);
    assert!(!dir.join(&part).exists(), "{} should not exist", part);
}

/// Creates test headers with common user agent
pub fn create_test_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(TEST_USER_AGENT));
    headers
}

/// Creates a hidden downloader writing to `dir`, with short retry delays
pub fn create_test_downloader_builder(dir: &Path) -> DownloaderBuilder {
    DownloaderBuilder::hidden()
        .directory(dir.to_path_buf())
        .retry_interval(Duration::from_millis(1), Duration::from_millis(5))
        .probe_retries(0)
        .headers(create_test_headers())
}

/// Creates a request for `url`
pub fn create_test_request(url: &str) -> DownloadRequest {
    DownloadRequest::try_from(url).expect("Failed to create request")
}
