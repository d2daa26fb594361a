//! Byte-range segments and segment planning.
//!
//! A segmented download splits the resource into contiguous [`Segment`]s that
//! together cover `[0, total_size)` exactly. Each segment is fetched by one
//! worker with its own `Range` request.
//!
//! # Examples
//!
//! ```rust
//! use segdl::segment::{connection_count, plan_segments};
//!
//! let count = connection_count(1_000_000, 4, 100_000);
//! let segments = plan_segments(1_000_000, count);
//! assert_eq!(segments.len(), 4);
//! assert_eq!(segments[3].range_header_value(), "bytes=750000-999999");
//! ```

pub mod plan;
pub mod segment;

pub use plan::{connection_count, plan_segments};
pub use segment::{Segment, SegmentState};
