//! Progress module containing progress bar functionality.
//!
//! - `style` - Progress bar styling options and templates
//! - `display` - Progress bar display management and coordination
//!
//! # Examples
//!
//! ```rust
//! use segdl::downloader::DownloaderBuilder;
//! use segdl::progress::{ProgressBarOpts, StyleOptions};
//!
//! let downloader = DownloaderBuilder::new()
//!     .style_options(StyleOptions::new(
//!         ProgressBarOpts::default(),
//!         ProgressBarOpts::hidden(),
//!     ))
//!     .build();
//! ```

pub(crate) mod display;
pub(crate) mod style;

pub use display::ProgressDisplay;
pub use style::{ProgressBarOpts, StyleOptions};
