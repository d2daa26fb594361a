//! Segdl downloads a single file over HTTP(S), splitting it into byte ranges
//! fetched concurrently when the server allows it.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use segdl::{download::DownloadRequest, downloader::DownloaderBuilder, Error};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! let iso = "https://cdimage.debian.org/debian-cd/current/amd64/iso-cd/debian.iso";
//! let request = DownloadRequest::try_from(iso)?.with_num_connections(8);
//! let downloader = DownloaderBuilder::new()
//!     .directory(PathBuf::from("output"))
//!     .build();
//! let result = downloader.download(&request).await?;
//! println!("saved {}", result.path().display());
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`cli`] - Command line arguments of the `downloader` binary
//! - [`download`] - The `DownloadRequest` input and the `DownloadResult` output
//! - [`downloader`] - The main `Downloader` and `DownloaderBuilder`
//! - [`error`] - Centralized error handling with the `Error` enum
//! - [`http`] - HTTP client construction and the metadata probe
//! - [`logging`] - `tracing` subscriber setup
//! - [`progress`] - Progress bar styling and display management
//! - [`retry`] - Attempt budget and backoff between attempts
//! - [`segment`] - Byte ranges and how a file is split into them
//! - [`utils`] - Header parsing and filename helpers

pub mod cli;
pub mod download;
pub mod downloader;
pub mod error;
pub mod http;
pub mod logging;
pub mod progress;
pub mod retry;
pub mod segment;
pub mod utils;

pub use download::{DownloadRequest, DownloadResult, SerialReason, TransferMode};
pub use downloader::{Downloader, DownloaderBuilder};
pub use error::{Error, Result};
pub use http::{create_http_client, probe, HttpClientConfig, Probe, ProbeMethod};
pub use progress::{ProgressBarOpts, StyleOptions};
pub use segment::{Segment, SegmentState};
