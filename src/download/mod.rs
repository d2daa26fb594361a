//! Download input and output types.
//!
//! - [`request`] - the immutable [`DownloadRequest`] built from user input
//! - [`result`] - the [`DownloadResult`] returned once the file is assembled
//!
//! # Examples
//!
//! ```rust
//! use segdl::download::DownloadRequest;
//! use std::convert::TryFrom;
//!
//! let request = DownloadRequest::try_from("https://example.com/file.zip")?;
//! println!("Downloading: {}", request.url());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod request;
pub mod result;

pub use request::{
    DownloadRequest, DEFAULT_NUM_CONNECTIONS, DEFAULT_RETRIES, DEFAULT_SEGMENT_THRESHOLD,
};
pub use result::{DownloadResult, SerialReason, TransferMode};
