//! Error handling for segdl.
//!
//! Every terminal failure of a download is reported through [`Error`]. Transient
//! failures of individual requests are retried inside the downloader and never
//! surface here on their own; only the aggregate outcome does, carrying enough
//! context (URL, byte range, attempt count) to diagnose what went wrong.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can happen when using segdl.
#[derive(Error, Debug)]
pub enum Error {
    /// The request parameters are not usable.
    ///
    /// Returned before any network activity, e.g. for a zero retry budget or
    /// a zero connection count.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Error from the underlying URL parser or the expected URL format.
    ///
    /// Also returned when no output filename can be derived from the URL and
    /// none was given explicitly.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The metadata probe failed, so the download could not be planned.
    #[error("Probe of {url} failed: {reason}")]
    ProbeFailed {
        /// Probed URL.
        url: String,
        /// Transport error or unexpected status.
        reason: String,
    },

    /// A segment (or the whole file on the serial path) never succeeded within
    /// its retry budget.
    #[error("Retries exhausted for {url} ({range}) after {attempts} attempts: {last_error}")]
    SegmentRetriesExhausted {
        /// Downloaded URL.
        url: String,
        /// Human readable byte range, e.g. `bytes 0-249999`.
        range: String,
        /// Number of attempts made.
        attempts: u32,
        /// Last error observed for this segment.
        last_error: String,
    },

    /// The assembled file does not have the size reported by the probe.
    #[error("Integrity mismatch: expected {expected} bytes, got {actual}")]
    IntegrityMismatch {
        /// Size reported by the server.
        expected: u64,
        /// Size found on disk.
        actual: u64,
    },

    /// Local filesystem failure while preparing, writing or publishing the
    /// output file.
    #[error("Cannot write {}: {source}", path.display())]
    Write {
        /// File being written.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The download was cancelled by the caller.
    #[error("Download cancelled")]
    Cancelled,

    /// I/O Error.
    #[error("I/O error")]
    IOError {
        #[from]
        source: io::Error,
    },

    /// Error from the Reqwest library.
    ///
    /// Mostly seen while building the HTTP client.
    #[error("Reqwest Error")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },
}

impl Error {
    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Write {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for operations that can fail with a segdl error.
pub type Result<T> = std::result::Result<T, Error>;
