//! Size and range header parsing.
//!
//! These helpers read the raw headers instead of relying on
//! `Response::content_length`, which reports the size of the received body
//! and is therefore `0` for `HEAD` responses.

use reqwest::header::{HeaderMap, ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_RANGE};

/// Parse the `Content-Length` header.
///
/// Returns `None` if the header is missing or is not a valid u64.
pub fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
}

/// Whether the server advertises byte-range support.
///
/// Any `Accept-Ranges` value other than `none` is taken as support.
pub fn accepts_ranges(headers: &HeaderMap) -> bool {
    match headers.get(ACCEPT_RANGES) {
        None => false,
        Some(x) if x.as_bytes().eq_ignore_ascii_case(b"none") => false,
        Some(_) => true,
    }
}

/// Parse Content-Range header to extract total size.
///
/// Content-Range header format: "bytes start-end/total"
///
/// # Example
///
/// ```rust
/// use segdl::utils::parse_content_range_total;
///
/// let total = parse_content_range_total("bytes 0-1023/2048");
/// assert_eq!(total, Some(2048));
/// ```
pub fn parse_content_range_total(content_range: &str) -> Option<u64> {
    content_range
        .split('/')
        .next_back()
        .and_then(|size| size.trim().parse::<u64>().ok())
}

/// Parse the first and last byte positions of a `Content-Range` value.
///
/// `"bytes 200-1023/5000"` gives `Some((200, 1023))`; unsatisfied ranges like
/// `"bytes */5000"` give `None`.
pub fn parse_content_range_bounds(content_range: &str) -> Option<(u64, u64)> {
    let spec = content_range.trim().strip_prefix("bytes")?.trim_start();
    let range = spec.split('/').next()?;
    let (first, last) = range.split_once('-')?;
    let first = first.trim().parse::<u64>().ok()?;
    let last = last.trim().parse::<u64>().ok()?;
    (first <= last).then_some((first, last))
}

/// Total size announced by the `Content-Range` header, if any.
pub fn content_range_total(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_RANGE)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_content_range_total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_parse_content_range_total() {
        assert_eq!(parse_content_range_total("bytes 0-1023/2048"), Some(2048));
        assert_eq!(parse_content_range_total("bytes 200-1023/5000"), Some(5000));
        assert_eq!(parse_content_range_total("bytes 0-0/1"), Some(1));
        assert_eq!(parse_content_range_total("invalid"), None);
        assert_eq!(parse_content_range_total("bytes 0-1023/*"), None);
        assert_eq!(parse_content_range_total(""), None);
    }

    #[test]
    fn test_parse_content_range_bounds() {
        assert_eq!(parse_content_range_bounds("bytes 200-1023/5000"), Some((200, 1023)));
        assert_eq!(parse_content_range_bounds("bytes 0-0/1"), Some((0, 0)));
        assert_eq!(parse_content_range_bounds("bytes */5000"), None);
        assert_eq!(parse_content_range_bounds("bytes 9-3/5000"), None);
        assert_eq!(parse_content_range_bounds("items 0-1/2"), None);
    }

    #[test]
    fn test_content_length_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(content_length(&headers), None);
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("1000000"));
        assert_eq!(content_length(&headers), Some(1_000_000));
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("lots"));
        assert_eq!(content_length(&headers), None);
    }

    #[test]
    fn test_accepts_ranges() {
        let mut headers = HeaderMap::new();
        assert!(!accepts_ranges(&headers));
        headers.insert(ACCEPT_RANGES, HeaderValue::from_static("none"));
        assert!(!accepts_ranges(&headers));
        headers.insert(ACCEPT_RANGES, HeaderValue::from_static("bytes"));
        assert!(accepts_ranges(&headers));
    }
}
