//! Retry budget and backoff between attempts.
//!
//! Segment fetches and whole-file fetches share the same policy: a fixed
//! number of attempts, separated by exponentially growing delays with bounded
//! jitter. The policy type is the one `reqwest-retry` uses for the transient
//! retry middleware, so the probe and the transfers back off the same way.
//!
//! # Examples
//!
//! ```rust
//! use segdl::retry::Backoff;
//! use std::time::Duration;
//!
//! let backoff = Backoff::new(3, Duration::from_millis(100), Duration::from_secs(2));
//! assert!(backoff.delay(1).is_some());
//! assert!(backoff.delay(3).is_none());
//! ```

pub mod backoff;

pub use backoff::{Backoff, DEFAULT_MAX_RETRY_INTERVAL, DEFAULT_MIN_RETRY_INTERVAL};
