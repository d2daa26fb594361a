//! Concurrent segment dispatch.

use super::context::TransferContext;
use super::worker::{fetch_segment, SegmentOutcome};
use crate::error::{Error, Result};
use crate::segment::Segment;

use futures::stream::{self, StreamExt};
use std::sync::atomic::Ordering;
use tracing::debug;

/// How a segmented transfer ended, short of a terminal error.
#[derive(Debug)]
pub(crate) enum Fetched {
    /// Every segment completed, sorted by offset.
    Complete(Vec<Segment>),
    /// The server answered a range request with the whole body; nothing
    /// written so far can be trusted.
    RangeIgnored,
}

/// Fetch every segment with at most `max_in_flight` concurrent requests.
///
/// The first terminal failure, or the first range request answered with the
/// whole body, cancels the remaining segments. The stream is still drained so
/// that no task keeps the temporary file open once this returns.
pub(crate) async fn fetch_segments(
    ctx: &TransferContext<'_>,
    segments: Vec<Segment>,
    max_in_flight: usize,
) -> Result<Fetched> {
    let count = segments.len();
    ctx.remaining.store(count, Ordering::Release);
    let siblings = ctx.cancel.child_token();

    let mut results = stream::iter(segments)
        .map(|segment| fetch_segment(ctx, &siblings, segment))
        .buffer_unordered(max_in_flight.max(1));

    let mut done = Vec::with_capacity(count);
    let mut range_ignored = false;
    let mut failure: Option<Error> = None;
    while let Some(result) = results.next().await {
        let stopped = range_ignored || failure.is_some();
        match result {
            Ok(SegmentOutcome::Done(segment)) => done.push(segment),
            Ok(SegmentOutcome::RangeIgnored) => {
                if !stopped {
                    debug!("range request answered with the whole body, cancelling the others");
                    siblings.cancel();
                    range_ignored = true;
                }
            }
            Err(_) if stopped => {}
            Err(e) => {
                debug!(error = %e, "segment failed, cancelling the others");
                siblings.cancel();
                failure = Some(e);
            }
        }
    }

    if let Some(e) = failure {
        return Err(e);
    }
    if range_ignored {
        return Ok(Fetched::RangeIgnored);
    }

    done.sort_by_key(|s| s.start);
    Ok(Fetched::Complete(done))
}

/// Check that `segments` (sorted by offset) cover `[0, total_size)` exactly
/// and were fully written. Returns the number of bytes written.
pub(crate) fn verify_coverage(segments: &[Segment], total_size: u64) -> Result<u64> {
    let mut offset = 0;
    let mut written = 0;
    for s in segments {
        if s.start != offset || s.written != s.len() {
            return Err(Error::IntegrityMismatch {
                expected: total_size,
                actual: written,
            });
        }
        offset = s.end;
        written += s.written;
    }
    if offset != total_size {
        return Err(Error::IntegrityMismatch {
            expected: total_size,
            actual: written,
        });
    }
    Ok(written)
}
