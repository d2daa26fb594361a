//! Download result reporting.
//!
//! A successful download produces a [`DownloadResult`] describing where the
//! file landed, how large it is, and which transfer mode was used.

use reqwest::Url;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Why a download was fetched with a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialReason {
    /// The server does not advertise byte-range support.
    NoRangeSupport,
    /// The server did not announce a size.
    UnknownSize,
    /// The resource is not larger than the segmenting threshold.
    BelowThreshold,
}

impl fmt::Display for SerialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SerialReason::NoRangeSupport => "server does not support range requests",
            SerialReason::UnknownSize => "server did not announce a content length",
            SerialReason::BelowThreshold => "content is below the segmenting threshold",
        };
        f.write_str(s)
    }
}

/// How the bytes were transferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    /// One whole-file request.
    Serial(SerialReason),
    /// Concurrent range requests.
    Segmented {
        /// Number of segments the resource was split into.
        segments: usize,
    },
}

impl TransferMode {
    /// Whether range requests were used.
    pub fn is_segmented(&self) -> bool {
        matches!(self, TransferMode::Segmented { .. })
    }
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferMode::Serial(_) => f.write_str("single request"),
            TransferMode::Segmented { segments } => write!(f, "{segments} segments"),
        }
    }
}

/// Represents a completed download.
#[derive(Debug, Clone)]
pub struct DownloadResult {
    /// URL the bytes came from, after redirects.
    url: Url,
    /// Final path of the assembled file.
    path: PathBuf,
    /// Size in bytes.
    size: u64,
    /// Transfer mode.
    mode: TransferMode,
    /// Wall clock time spent, probe included.
    elapsed: Duration,
}

impl DownloadResult {
    /// Create a new [`DownloadResult`].
    pub fn new(url: Url, path: PathBuf, size: u64, mode: TransferMode, elapsed: Duration) -> Self {
        Self {
            url,
            path,
            size,
            mode,
            elapsed,
        }
    }

    /// Get the effective URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Get the path of the downloaded file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the size of the downloaded file.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Get the transfer mode.
    pub fn mode(&self) -> TransferMode {
        self.mode
    }

    /// Get the elapsed time.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Average throughput in bytes per second.
    pub fn bytes_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.size as f64 / secs
        }
    }
}
