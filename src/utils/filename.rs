//! Output filename derivation.

use percent_encoding::percent_decode_str;
use reqwest::Url;

/// Last path segment of `url`, percent-decoded.
///
/// Returns `None` when the URL has no path or ends with a `/`.
///
/// ```rust
/// use reqwest::Url;
/// use segdl::utils::filename_from_url;
///
/// let url = Url::parse("https://example.com/pub/data%20set.tar.gz?x=1").unwrap();
/// assert_eq!(filename_from_url(&url).as_deref(), Some("data set.tar.gz"));
/// ```
pub fn filename_from_url(url: &Url) -> Option<String> {
    let last = url.path_segments()?.next_back()?;
    let decoded = percent_decode_str(last).decode_utf8_lossy();
    let decoded = decoded.trim();
    if decoded.is_empty() || decoded == "." || decoded == ".." || decoded.contains('/') {
        return None;
    }
    Some(decoded.to_string())
}
