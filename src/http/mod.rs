//! HTTP module containing HTTP client functionality.
//!
//! - [`client`] - HTTP client creation and middleware configuration
//! - [`probe`] - the metadata request that discovers size and range support
//!
//! # Examples
//!
//! ```rust,no_run
//! use segdl::http::{create_http_client, probe, HttpClientConfig, ProbeMethod};
//! use reqwest::Url;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = create_http_client(HttpClientConfig::default())?;
//! let url = Url::parse("https://example.com/file.iso")?;
//! let info = probe(&client, &url, ProbeMethod::Head).await?;
//! println!("{:?} bytes, ranges: {}", info.total_size, info.accepts_ranges);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod probe;

pub use client::{create_http_client, HttpClientConfig};
pub use probe::{probe, Probe, ProbeMethod};
