//! Whole-file transfer, used when segmenting is not possible or not worth it.

use super::context::TransferContext;
use super::worker::{wait_before_retry, AttemptError, Wait};
use crate::error::{Error, Result};

use futures::StreamExt;
use std::io::SeekFrom;
use tokio::{
    fs::{File, OpenOptions},
    io::{AsyncSeekExt, AsyncWriteExt},
};
use tracing::{debug, warn};

/// Download the whole resource with a plain `GET`, retrying from scratch.
///
/// Returns the number of bytes written. When `total_size` is known, a body of
/// any other length fails the attempt.
pub(crate) async fn fetch_whole(ctx: &TransferContext<'_>, total_size: Option<u64>) -> Result<u64> {
    let mut file = OpenOptions::new()
        .write(true)
        .open(&ctx.part_path)
        .await
        .map_err(|e| Error::write(&ctx.part_path, e))?;

    let mut failed_attempts = 0;
    loop {
        if ctx.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let attempt = tokio::select! {
            _ = ctx.cancel.cancelled() => return Err(Error::Cancelled),
            r = fetch_once(ctx, &mut file, total_size) => r,
        };

        let err = match attempt {
            Ok(written) => return Ok(written),
            Err(AttemptError::Write(e)) => return Err(Error::write(&ctx.part_path, e)),
            Err(e) => e,
        };

        failed_attempts += 1;
        warn!(
            attempt = failed_attempts,
            max_attempts = ctx.backoff.max_attempts(),
            error = %err,
            "download attempt failed"
        );
        match wait_before_retry(ctx, &ctx.cancel, failed_attempts).await {
            Wait::Retry => debug!("try again"),
            Wait::Cancelled => return Err(Error::Cancelled),
            Wait::Exhausted => {
                let range = match total_size {
                    Some(0) | None => "whole file".to_string(),
                    Some(size) => format!("whole file, bytes 0-{}", size - 1),
                };
                return Err(Error::SegmentRetriesExhausted {
                    url: ctx.url.to_string(),
                    range,
                    attempts: failed_attempts,
                    last_error: err.to_string(),
                });
            }
        }
    }
}

async fn fetch_once(
    ctx: &TransferContext<'_>,
    file: &mut File,
    total_size: Option<u64>,
) -> std::result::Result<u64, AttemptError> {
    // Every attempt starts over from an empty file.
    file.set_len(0).await.map_err(AttemptError::Write)?;
    file.seek(SeekFrom::Start(0))
        .await
        .map_err(AttemptError::Write)?;
    let pb = ctx.display.main();
    pb.set_position(0);

    debug!(url = %ctx.url, "fetching whole file");
    let res = ctx.client.get(ctx.url.clone()).send().await?;
    let status = res.status();
    if !status.is_success() {
        return Err(AttemptError::Status(status));
    }

    let mut written: u64 = 0;
    let mut stream = res.bytes_stream();
    while let Some(item) = stream.next().await {
        let chunk = item?;
        let len = chunk.len() as u64;
        if let Some(total) = total_size {
            if written + len > total {
                return Err(AttemptError::Overrun { expected: total });
            }
        }
        file.write_all(&chunk).await.map_err(AttemptError::Write)?;
        written += len;
        pb.inc(len);
    }
    file.flush().await.map_err(AttemptError::Write)?;

    match total_size {
        Some(total) if written < total => Err(AttemptError::Truncated {
            expected: total,
            received: written,
        }),
        _ => Ok(written),
    }
}
