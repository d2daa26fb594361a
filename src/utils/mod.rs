//! Shared utility functions.
//!
//! This module contains helpers used by the probe and the segment workers:
//!
//! - [`content_length`] - `Content-Length`, `Accept-Ranges` and `Content-Range` parsing
//! - [`filename`] - output filename derivation from a URL
//!
//! # Examples
//!
//! ```rust
//! use segdl::utils::{parse_content_range_bounds, parse_content_range_total};
//!
//! let header_value = "bytes 0-1023/2048";
//! assert_eq!(parse_content_range_total(header_value), Some(2048));
//! assert_eq!(parse_content_range_bounds(header_value), Some((0, 1023)));
//! ```

pub mod content_length;
pub mod filename;

pub use content_length::{
    accepts_ranges, content_length, content_range_total, parse_content_range_bounds,
    parse_content_range_total,
};
pub use filename::filename_from_url;
