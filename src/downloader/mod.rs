//! Downloader module containing the download orchestration, its builder and
//! configuration.
//!
//! - `downloader` - the [`Downloader`], which probes, plans and assembles a file
//! - `builder` - [`DownloaderBuilder`] for configuring a downloader
//! - `config` - configuration structures and callback types
//!
//! The transfer itself is split between the whole-file path (`serial`) and the
//! concurrent range path (`segmented` dispatching `worker` tasks), all sharing
//! one `context`.
//!
//! # Examples
//!
//! ```rust
//! use segdl::downloader::DownloaderBuilder;
//! use std::path::PathBuf;
//!
//! let downloader = DownloaderBuilder::hidden()
//!     .directory(PathBuf::from("./downloads"))
//!     .on_segment_complete(|segment| println!("{segment} done"))
//!     .build();
//! ```

pub mod builder;
pub mod config;
pub(crate) mod context;
pub mod downloader;
pub(crate) mod segmented;
pub(crate) mod serial;
pub(crate) mod worker;

pub use builder::DownloaderBuilder;
pub use config::{DownloaderConfig, SegmentCallback};
pub use downloader::{choose_mode, part_path, Downloader, PART_SUFFIX};
