//! Per-segment transfer task.
//!
//! A worker owns one [`Segment`] for its whole life. It issues range requests
//! for the bytes still missing, writes them at the segment's offset in the
//! temporary file, and retries failed attempts until the segment is complete
//! or its attempt budget is spent.

use super::context::TransferContext;
use crate::error::{Error, Result};
use crate::segment::{Segment, SegmentState};
use crate::utils::parse_content_range_bounds;

use futures::StreamExt;
use indicatif::ProgressBar;
use reqwest::{
    header::{CONTENT_RANGE, RANGE},
    StatusCode,
};
use std::io::{self, SeekFrom};
use thiserror::Error;
use tokio::{
    fs::{File, OpenOptions},
    io::{AsyncSeekExt, AsyncWriteExt},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Why a single attempt failed.
///
/// Everything but [`AttemptError::Write`] is transient and retried.
#[derive(Error, Debug)]
pub(crate) enum AttemptError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest_middleware::Error),
    #[error("body stream failed: {0}")]
    Stream(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(StatusCode),
    #[error("server ignored the byte range and sent the whole body")]
    RangeIgnored,
    #[error("server answered with range starting at {got}, expected {expected}")]
    RangeMismatch { expected: u64, got: u64 },
    #[error("server sent more than the {expected} bytes requested")]
    Overrun { expected: u64 },
    #[error("truncated body: got {received} of {expected} bytes")]
    Truncated { expected: u64, received: u64 },
    #[error("local write failed: {0}")]
    Write(io::Error),
}

/// How a segment worker ended, short of a terminal error.
#[derive(Debug)]
pub(crate) enum SegmentOutcome {
    /// Every byte of the segment is on disk.
    Done(Segment),
    /// The server answered a range request with the whole body.
    RangeIgnored,
}

/// Outcome of waiting before the next attempt.
pub(crate) enum Wait {
    Retry,
    Exhausted,
    Cancelled,
}

/// Sleep the backoff delay for `failed_attempts`, unless the budget is spent
/// or the download is cancelled meanwhile.
pub(crate) async fn wait_before_retry(
    ctx: &TransferContext<'_>,
    cancel: &CancellationToken,
    failed_attempts: u32,
) -> Wait {
    let Some(delay) = ctx.backoff.delay(failed_attempts) else {
        return Wait::Exhausted;
    };
    debug!(delay_ms = delay.as_millis() as u64, "backing off");
    tokio::select! {
        _ = cancel.cancelled() => Wait::Cancelled,
        _ = tokio::time::sleep(delay) => Wait::Retry,
    }
}

/// Download one segment to completion.
///
/// `cancel` is shared with the sibling segments: it is triggered on the first
/// terminal failure of any of them, or when the whole download is cancelled.
pub(crate) async fn fetch_segment(
    ctx: &TransferContext<'_>,
    cancel: &CancellationToken,
    segment: Segment,
) -> Result<SegmentOutcome> {
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }

    let mut file = OpenOptions::new()
        .write(true)
        .open(&ctx.part_path)
        .await
        .map_err(|e| Error::write(&ctx.part_path, e))?;
    let pb = ctx
        .display
        .create_child_progress(segment.len(), segment.written, &segment.name());

    match run_segment(ctx, cancel, &mut file, segment, &pb).await {
        Ok(SegmentOutcome::Done(segment)) => {
            ctx.display.finish_child(pb);
            let remaining = ctx.segment_done();
            debug!(
                segment = %segment,
                failed_attempts = segment.attempts,
                remaining,
                "segment complete"
            );
            if let Some(ref callback) = ctx.on_segment_complete {
                callback(&segment);
            }
            Ok(SegmentOutcome::Done(segment))
        }
        other => {
            ctx.display.abandon_child(pb);
            other
        }
    }
}

/// Attempt loop of one segment.
async fn run_segment(
    ctx: &TransferContext<'_>,
    cancel: &CancellationToken,
    file: &mut File,
    mut segment: Segment,
    pb: &ProgressBar,
) -> Result<SegmentOutcome> {
    debug!(segment = %segment, index = segment.index, "start downloading");
    loop {
        segment.state = SegmentState::InFlight;
        let attempt = tokio::select! {
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            r = fetch_range(ctx, file, &mut segment, pb) => r,
        };

        let err = match attempt {
            Ok(()) => break,
            Err(AttemptError::RangeIgnored) => {
                segment.state = SegmentState::Failed;
                debug!(segment = %segment, "server ignored the range request");
                return Ok(SegmentOutcome::RangeIgnored);
            }
            Err(AttemptError::Write(e)) => {
                segment.state = SegmentState::Failed;
                return Err(Error::write(&ctx.part_path, e));
            }
            Err(e) => e,
        };

        segment.attempts += 1;
        warn!(
            segment = %segment,
            attempt = segment.attempts,
            max_attempts = ctx.backoff.max_attempts(),
            error = %err,
            "segment attempt failed"
        );
        match wait_before_retry(ctx, cancel, segment.attempts).await {
            Wait::Retry => debug!(segment = %segment, "try again"),
            Wait::Cancelled => return Err(Error::Cancelled),
            Wait::Exhausted => {
                segment.state = SegmentState::Failed;
                return Err(Error::SegmentRetriesExhausted {
                    url: ctx.url.to_string(),
                    range: segment.to_string(),
                    attempts: segment.attempts,
                    last_error: err.to_string(),
                });
            }
        }
    }

    segment.state = SegmentState::Done;
    Ok(SegmentOutcome::Done(segment))
}

/// One attempt: request the missing tail of `segment` and write it in place.
///
/// `segment.written` advances with every chunk written, so a later attempt
/// resumes where this one stopped.
async fn fetch_range(
    ctx: &TransferContext<'_>,
    file: &mut File,
    segment: &mut Segment,
    pb: &ProgressBar,
) -> std::result::Result<(), AttemptError> {
    let range = segment.range_header_value();
    debug!(%range, "fetching");
    let res = ctx
        .client
        .get(ctx.url.clone())
        .header(RANGE, range.as_str())
        .send()
        .await?;

    let status = res.status();
    if status == StatusCode::OK {
        return Err(AttemptError::RangeIgnored);
    }
    if status != StatusCode::PARTIAL_CONTENT {
        return Err(AttemptError::Status(status));
    }
    if let Some((first, _)) = res
        .headers()
        .get(CONTENT_RANGE)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_content_range_bounds)
    {
        if first != segment.cursor() {
            return Err(AttemptError::RangeMismatch {
                expected: segment.cursor(),
                got: first,
            });
        }
    }

    file.seek(SeekFrom::Start(segment.cursor()))
        .await
        .map_err(AttemptError::Write)?;

    let mut stream = res.bytes_stream();
    while let Some(item) = stream.next().await {
        let chunk = item?;
        let len = chunk.len() as u64;
        if len > segment.remaining() {
            return Err(AttemptError::Overrun {
                expected: segment.len(),
            });
        }
        file.write_all(&chunk).await.map_err(AttemptError::Write)?;
        segment.written += len;
        pb.inc(len);
        ctx.display.inc_main(len);
    }
    file.flush().await.map_err(AttemptError::Write)?;

    if segment.remaining() > 0 {
        return Err(AttemptError::Truncated {
            expected: segment.len(),
            received: segment.written,
        });
    }
    Ok(())
}
