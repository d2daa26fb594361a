//! Metadata probe run before planning a download.

use crate::error::{Error, Result};
use crate::utils::{accepts_ranges, content_length, content_range_total};

use reqwest::{header::RANGE, StatusCode, Url};
use reqwest_middleware::ClientWithMiddleware;
use tracing::debug;

/// How the probe asks the server for metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeMethod {
    /// `HEAD` request; range support comes from `Accept-Ranges`.
    #[default]
    Head,
    /// `GET` with `Range: bytes=0-0`; range support is a `206` answer and the
    /// size comes from `Content-Range`. Useful for servers that answer `HEAD`
    /// badly.
    RangeGet,
}

/// What the server told us about the resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    /// URL after redirects.
    pub url: Url,
    /// Total size in bytes, when announced.
    pub total_size: Option<u64>,
    /// Whether byte-range requests are honoured.
    pub accepts_ranges: bool,
    /// Status of the probe response.
    pub status: StatusCode,
}

/// Query size and range support of `url`.
pub async fn probe(client: &ClientWithMiddleware, url: &Url, method: ProbeMethod) -> Result<Probe> {
    let failed = |reason: String| Error::ProbeFailed {
        url: url.to_string(),
        reason,
    };

    debug!(%url, ?method, "probing");
    let request = match method {
        ProbeMethod::Head => client.head(url.clone()),
        ProbeMethod::RangeGet => client.get(url.clone()).header(RANGE, "bytes=0-0"),
    };
    let res = request.send().await.map_err(|e| failed(e.to_string()))?;

    let status = res.status();
    if !status.is_success() {
        return Err(failed(format!("unexpected status {}", status)));
    }

    let headers = res.headers();
    let (total_size, ranges) = match method {
        ProbeMethod::Head => (content_length(headers), accepts_ranges(headers)),
        ProbeMethod::RangeGet if status == StatusCode::PARTIAL_CONTENT => {
            (content_range_total(headers), true)
        }
        // The server ignored the range and started sending the whole body.
        ProbeMethod::RangeGet => (content_length(headers), false),
    };

    let probe = Probe {
        url: res.url().clone(),
        total_size,
        accepts_ranges: ranges,
        status,
    };
    debug!(
        url = %probe.url,
        total_size = ?probe.total_size,
        accepts_ranges = probe.accepts_ranges,
        "probe complete"
    );
    Ok(probe)
}
