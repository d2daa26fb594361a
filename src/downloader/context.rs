//! State shared by every transfer task of one download.

use super::config::SegmentCallback;
use crate::progress::ProgressDisplay;
use crate::retry::Backoff;

use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Everything a transfer task needs, passed explicitly to each of them.
///
/// Tasks only read from it, apart from the atomic `remaining` counter and the
/// progress bars. Cancelling `cancel` stops every task at its next I/O
/// boundary.
pub(crate) struct TransferContext<'a> {
    /// Client without retry middleware; attempts are counted by the tasks.
    pub client: ClientWithMiddleware,
    /// Effective URL of the resource.
    pub url: Url,
    /// Temporary file the bytes are written to.
    pub part_path: PathBuf,
    /// Attempt budget and delays.
    pub backoff: Backoff,
    /// Cancelled when the whole download is; segment siblings share a child
    /// token of it.
    pub cancel: CancellationToken,
    /// Segments not done yet.
    pub remaining: AtomicUsize,
    /// Progress bars.
    pub display: &'a ProgressDisplay,
    /// Segment completion callback.
    pub on_segment_complete: Option<Arc<SegmentCallback>>,
}

impl TransferContext<'_> {
    /// Mark one segment done and return how many are left.
    pub fn segment_done(&self) -> usize {
        self.remaining
            .fetch_sub(1, Ordering::AcqRel)
            .saturating_sub(1)
    }
}
