//! The immutable description of one download.
//!
//! # Examples
//!
//! ```rust
//! use segdl::download::DownloadRequest;
//! use std::convert::TryFrom;
//!
//! let request = DownloadRequest::try_from("https://example.com/file.zip")?
//!     .with_retries(3)
//!     .with_num_connections(8)
//!     .with_segment_threshold(1024 * 1024);
//! assert_eq!(request.num_connections(), 8);
//! # Ok::<(), segdl::Error>(())
//! ```

use crate::error::{Error, Result};

use reqwest::Url;
use std::convert::TryFrom;

/// Maximum attempts per segment (or for the whole file) unless configured.
pub const DEFAULT_RETRIES: u32 = 5;
/// Maximum concurrent connections unless configured.
pub const DEFAULT_NUM_CONNECTIONS: usize = 4;
/// Size in bytes at or below which segmenting is skipped unless configured.
pub const DEFAULT_SEGMENT_THRESHOLD: u64 = 16 * 1024;

/// Represents a file to be downloaded and how hard to try.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    url: Url,
    retries: u32,
    num_connections: usize,
    segment_threshold: u64,
    filename: Option<String>,
}

impl DownloadRequest {
    /// Creates a new [`DownloadRequest`] with the default limits.
    ///
    /// The output filename is derived from the URL once redirects are
    /// resolved, unless [`DownloadRequest::with_filename`] sets one.
    pub fn new(url: &Url) -> Self {
        Self {
            url: url.clone(),
            retries: DEFAULT_RETRIES,
            num_connections: DEFAULT_NUM_CONNECTIONS,
            segment_threshold: DEFAULT_SEGMENT_THRESHOLD,
            filename: None,
        }
    }

    /// Set the maximum number of attempts per segment, the first included.
    pub fn with_retries(self, retries: u32) -> Self {
        Self { retries, ..self }
    }

    /// Set the maximum number of concurrent connections.
    pub fn with_num_connections(self, num_connections: usize) -> Self {
        Self {
            num_connections,
            ..self
        }
    }

    /// Set the size at or below which the file is fetched with a single request.
    pub fn with_segment_threshold(self, segment_threshold: u64) -> Self {
        Self {
            segment_threshold,
            ..self
        }
    }

    /// Set the output filename explicitly.
    pub fn with_filename(self, filename: impl Into<String>) -> Self {
        Self {
            filename: Some(filename.into()),
            ..self
        }
    }

    /// Target URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Maximum attempts per segment.
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Maximum concurrent connections.
    pub fn num_connections(&self) -> usize {
        self.num_connections
    }

    /// Segmenting threshold in bytes.
    pub fn segment_threshold(&self) -> u64 {
        self.segment_threshold
    }

    /// Explicit output filename, if any.
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Check the limits before any network activity.
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.url.scheme(), "http" | "https") {
            return Err(Error::InvalidUrl(format!(
                "The url \"{}\" is not an http(s) url",
                self.url
            )));
        }
        if self.retries == 0 {
            return Err(Error::InvalidArgument(
                "retries must be at least 1".into(),
            ));
        }
        if self.num_connections == 0 {
            return Err(Error::InvalidArgument(
                "the number of connections must be at least 1".into(),
            ));
        }
        if let Some(name) = &self.filename {
            if name.is_empty() || name.contains('/') || name == "." || name == ".." {
                return Err(Error::InvalidArgument(format!(
                    "\"{}\" is not a valid output filename",
                    name
                )));
            }
        }
        Ok(())
    }
}

impl TryFrom<&Url> for DownloadRequest {
    type Error = crate::error::Error;

    fn try_from(value: &Url) -> Result<Self> {
        let request = DownloadRequest::new(value);
        request.validate()?;
        Ok(request)
    }
}

impl TryFrom<&str> for DownloadRequest {
    type Error = crate::error::Error;

    fn try_from(value: &str) -> Result<Self> {
        Url::parse(value)
            .map_err(|e| {
                Error::InvalidUrl(format!("The url \"{}\" cannot be parsed: {}", value, e))
            })
            .and_then(|u| DownloadRequest::try_from(&u))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let r = DownloadRequest::try_from("http://domain.com/file.zip").unwrap();
        assert_eq!(r.retries(), DEFAULT_RETRIES);
        assert_eq!(r.num_connections(), DEFAULT_NUM_CONNECTIONS);
        assert_eq!(r.segment_threshold(), DEFAULT_SEGMENT_THRESHOLD);
        assert!(r.filename().is_none());
    }

    #[test]
    fn rejects_unparsable_url() {
        let err = DownloadRequest::try_from("not a url").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err = DownloadRequest::try_from("ftp://domain.com/file.zip").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn rejects_zero_limits() {
        let r = DownloadRequest::try_from("http://domain.com/file.zip").unwrap();
        assert!(matches!(
            r.clone().with_retries(0).validate(),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            r.with_num_connections(0).validate(),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn rejects_path_like_filename() {
        let r = DownloadRequest::try_from("http://domain.com/file.zip")
            .unwrap()
            .with_filename("../etc/passwd");
        assert!(matches!(r.validate(), Err(Error::InvalidArgument(_))));
    }
}
