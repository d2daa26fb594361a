//! Core downloader implementation.
//!
//! This module contains the main [`Downloader`] struct. A download goes
//! through the following steps:
//!
//! 1. probe the URL for its size and range support;
//! 2. pick the transfer mode: a single request, or concurrent range requests
//!    when the server supports them and the file is above the threshold;
//! 3. transfer into `<name>.part`, retrying failed requests;
//! 4. check the size and rename the temporary file to its final name.
//!
//! Any terminal failure removes the temporary file, so a file under the final
//! name is always complete.
//!
//! # Examples
//!
//! ```rust,no_run
//! use segdl::downloader::DownloaderBuilder;
//! use segdl::download::DownloadRequest;
//! use std::convert::TryFrom;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = DownloaderBuilder::new().build();
//! let request = DownloadRequest::try_from("https://example.com/file1.zip")?
//!     .with_num_connections(8);
//!
//! let result = downloader.download(&request).await?;
//! println!("{} bytes in {:?}", result.size(), result.elapsed());
//! # Ok(())
//! # }
//! ```

use super::config::DownloaderConfig;
use super::context::TransferContext;
use super::segmented::{fetch_segments, verify_coverage, Fetched};
use super::serial::fetch_whole;
use crate::download::{DownloadRequest, DownloadResult, SerialReason, TransferMode};
use crate::error::{Error, Result};
use crate::http::{create_http_client, probe, Probe, ProbeMethod};
use crate::progress::ProgressDisplay;
use crate::retry::Backoff;
use crate::segment::{connection_count, plan_segments};
use crate::utils::filename_from_url;

use reqwest::header::HeaderMap;
use std::ffi::OsString;
use std::fmt;
use std::fmt::Debug;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicUsize;
use std::time::Instant;
use tokio::fs;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Suffix of the temporary file a download is written to.
pub const PART_SUFFIX: &str = ".part";

/// Represents the download controller.
///
/// A downloader can be created via its builder:
///
/// ```rust
/// # fn main()  {
/// use segdl::downloader::DownloaderBuilder;
///
/// let d = DownloaderBuilder::new().build();
/// # }
/// ```
#[derive(Clone)]
pub struct Downloader {
    config: DownloaderConfig,
}

impl Debug for Downloader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Downloader")
            .field("config", &self.config)
            .finish()
    }
}

impl Downloader {
    /// Creates a new Downloader with the given configuration.
    pub(crate) fn new(config: DownloaderConfig) -> Self {
        Self { config }
    }

    /// Gets the directory where files will be downloaded.
    pub fn directory(&self) -> &PathBuf {
        &self.config.directory
    }

    /// Gets the custom headers.
    pub fn headers(&self) -> Option<&HeaderMap> {
        self.config.headers.as_ref()
    }

    /// Gets whether range requests are used to probe the content length.
    pub fn use_range_for_content_length(&self) -> bool {
        self.config.probe_method == ProbeMethod::RangeGet
    }

    /// Gets the full configuration.
    pub fn config(&self) -> &DownloaderConfig {
        &self.config
    }

    /// Download `request` into the configured directory.
    pub async fn download(&self, request: &DownloadRequest) -> Result<DownloadResult> {
        self.download_with_cancel(request, CancellationToken::new())
            .await
    }

    /// Download `request`, giving up with [`Error::Cancelled`] as soon as
    /// `cancel` is triggered.
    pub async fn download_with_cancel(
        &self,
        request: &DownloadRequest,
        cancel: CancellationToken,
    ) -> Result<DownloadResult> {
        request.validate()?;
        let started = Instant::now();

        let probe_client = create_http_client(
            self.config
                .http_client_config(self.config.probe_retries),
        )?;
        let client = create_http_client(self.config.http_client_config(0))?;

        let info = tokio::select! {
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            p = probe(&probe_client, request.url(), self.config.probe_method) => p?,
        };

        let filename = resolve_filename(request, &info)?;
        let output = self.config.directory.join(&filename);
        let part_path = part_path(&output);
        let mode = choose_mode(request, &info);
        info!(
            url = %info.url,
            output = %output.display(),
            size = ?info.total_size,
            "downloading"
        );
        match mode {
            TransferMode::Serial(reason) => info!(%reason, "fetching with a single request"),
            TransferMode::Segmented { segments } => {
                info!(segments, "fetching with concurrent range requests")
            }
        }

        fs::create_dir_all(&self.config.directory)
            .await
            .map_err(|e| Error::write(&self.config.directory, e))?;
        prepare_part_file(&part_path, mode, info.total_size).await?;

        let display = ProgressDisplay::new(
            self.config.style_options.clone(),
            info.total_size,
            &filename,
        );
        let ctx = TransferContext {
            client,
            url: info.url.clone(),
            part_path: part_path.clone(),
            backoff: Backoff::new(
                request.retries(),
                self.config.min_retry_interval,
                self.config.max_retry_interval,
            ),
            cancel: cancel.child_token(),
            remaining: AtomicUsize::new(0),
            display: &display,
            on_segment_complete: self.config.on_segment_complete.clone(),
        };

        let outcome = self.transfer(&ctx, request, mode, info.total_size).await;
        drop(ctx);

        let (size, mode) = match outcome {
            Ok(done) => done,
            Err(e) => {
                display.abandon();
                discard_part_file(&part_path).await;
                return Err(e);
            }
        };

        if let Err(e) = fs::rename(&part_path, &output).await {
            display.abandon();
            discard_part_file(&part_path).await;
            return Err(Error::write(&output, e));
        }
        display.finish();

        let result = DownloadResult::new(info.url, output, size, mode, started.elapsed());
        info!(
            path = %result.path().display(),
            size = result.size(),
            elapsed_ms = result.elapsed().as_millis() as u64,
            "download complete"
        );
        Ok(result)
    }

    /// Run the transfer for `mode` and check the size of the temporary file.
    ///
    /// Returns the size and the mode actually used: a server that answers a
    /// range request with the whole body is fetched again with one request.
    async fn transfer(
        &self,
        ctx: &TransferContext<'_>,
        request: &DownloadRequest,
        mode: TransferMode,
        total_size: Option<u64>,
    ) -> Result<(u64, TransferMode)> {
        let (written, mode) = match (mode, total_size) {
            (TransferMode::Segmented { segments }, Some(total)) => {
                let plan = plan_segments(total, segments);
                match fetch_segments(ctx, plan, request.num_connections()).await? {
                    Fetched::Complete(done) => (verify_coverage(&done, total)?, mode),
                    Fetched::RangeIgnored => {
                        let reason = SerialReason::NoRangeSupport;
                        info!(%reason, "range request ignored, fetching with a single request");
                        (
                            fetch_whole(ctx, total_size).await?,
                            TransferMode::Serial(reason),
                        )
                    }
                }
            }
            _ => (fetch_whole(ctx, total_size).await?, mode),
        };

        let on_disk = fs::metadata(&ctx.part_path)
            .await
            .map_err(|e| Error::write(&ctx.part_path, e))?
            .len();
        let expected = total_size.unwrap_or(written);
        if on_disk != expected || written != expected {
            return Err(Error::IntegrityMismatch {
                expected,
                actual: on_disk.min(written),
            });
        }
        Ok((on_disk, mode))
    }
}

/// Decide between a single request and concurrent range requests.
pub fn choose_mode(request: &DownloadRequest, probe: &Probe) -> TransferMode {
    let Some(total) = probe.total_size else {
        return TransferMode::Serial(SerialReason::UnknownSize);
    };
    if !probe.accepts_ranges {
        return TransferMode::Serial(SerialReason::NoRangeSupport);
    }
    if total <= request.segment_threshold() {
        return TransferMode::Serial(SerialReason::BelowThreshold);
    }
    let count = connection_count(
        total,
        request.num_connections(),
        request.segment_threshold(),
    );
    TransferMode::Segmented {
        segments: count.min(total as usize),
    }
}

/// Explicit filename, else the last path segment of the effective URL, else
/// the last path segment of the requested URL.
fn resolve_filename(request: &DownloadRequest, probe: &Probe) -> Result<String> {
    if let Some(name) = request.filename() {
        return Ok(name.to_string());
    }
    filename_from_url(&probe.url)
        .or_else(|| filename_from_url(request.url()))
        .ok_or_else(|| {
            Error::InvalidUrl(format!(
                "The url \"{}\" does not contain a filename",
                probe.url
            ))
        })
}

/// `<output>.part`
pub fn part_path(output: &Path) -> PathBuf {
    let mut name = OsString::from(output.as_os_str());
    name.push(PART_SUFFIX);
    PathBuf::from(name)
}

/// Create or truncate the temporary file; preallocate it for segmented
/// transfers so every worker can write at its own offset.
async fn prepare_part_file(path: &Path, mode: TransferMode, total_size: Option<u64>) -> Result<()> {
    debug!(path = %path.display(), "creating temporary file");
    let file = fs::File::create(path)
        .await
        .map_err(|e| Error::write(path, e))?;
    if let (TransferMode::Segmented { .. }, Some(total)) = (mode, total_size) {
        file.set_len(total)
            .await
            .map_err(|e| Error::write(path, e))?;
    }
    Ok(())
}

async fn discard_part_file(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => debug!(path = %path.display(), "removed temporary file"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "cannot remove temporary file"),
    }
}
