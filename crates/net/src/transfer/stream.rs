//! Low-level streaming of a response body to disk

use futures::StreamExt;
use ghfetch_errors::{Error, NetworkError};
use ghfetch_events::{DownloadEvent, EventEmitter, EventSender};
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::fs::{self as tokio_fs, File, OpenOptions};
use tokio::io::AsyncWriteExt;

pub(super) struct StreamParams<'a> {
    pub display_url: &'a str,
    pub resume_offset: u64,
    pub chunk_timeout: Duration,
    pub events: &'a Option<EventSender>,
}

/// Open the output file, appending when resuming
async fn open_output(dest_path: &Path, resume_offset: u64) -> Result<File, Error> {
    if let Some(parent) = dest_path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio_fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::io_with_path(&e, parent))?;
        }
    }

    let file = if resume_offset > 0 {
        OpenOptions::new().append(true).open(dest_path).await
    } else {
        File::create(dest_path).await
    };
    file.map_err(|e| Error::io_with_path(&e, dest_path))
}

fn should_report_progress(first_chunk: bool, last_update: &Instant) -> bool {
    first_chunk || last_update.elapsed() >= Duration::from_millis(50)
}

/// Stream the body into `dest_path`, returning the number of bytes written
pub(super) async fn stream_to_file(
    response: reqwest::Response,
    dest_path: &Path,
    params: &StreamParams<'_>,
) -> Result<u64, Error> {
    let total_bytes = response
        .content_length()
        .map(|remaining| params.resume_offset + remaining);
    let mut file = open_output(dest_path, params.resume_offset).await?;

    let mut written = 0u64;
    let mut last_progress_update = Instant::now();
    let mut first_chunk = true;
    let mut stream = response.bytes_stream();

    loop {
        match tokio::time::timeout(params.chunk_timeout, stream.next()).await {
            Ok(Some(chunk_result)) => {
                let chunk = chunk_result
                    .map_err(|e| NetworkError::DownloadFailed(e.without_url().to_string()))?;
                file.write_all(&chunk)
                    .await
                    .map_err(|e| Error::io_with_path(&e, dest_path))?;
                written += chunk.len() as u64;

                if should_report_progress(first_chunk, &last_progress_update) {
                    params.events.emit_download(DownloadEvent::Progress {
                        url: params.display_url.to_string(),
                        bytes_downloaded: params.resume_offset + written,
                        total_bytes,
                    });
                    last_progress_update = Instant::now();
                    first_chunk = false;
                }
            }
            Ok(None) => break,
            Err(_) => {
                // Keep what arrived so the next attempt can resume from it
                file.flush().await.ok();
                return Err(NetworkError::Timeout {
                    url: params.display_url.to_string(),
                }
                .into());
            }
        }
    }

    file.flush()
        .await
        .map_err(|e| Error::io_with_path(&e, dest_path))?;

    params.events.emit_download(DownloadEvent::Progress {
        url: params.display_url.to_string(),
        bytes_downloaded: params.resume_offset + written,
        total_bytes,
    });

    Ok(written)
}
