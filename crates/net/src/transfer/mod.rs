//! Resumable authenticated file transfer
//!
//! [`Transport`] is the seam the download strategies talk to. The HTTP
//! implementation sends `Range: bytes={offset}-` when resuming, appends to
//! the output file, and reports every non-success outcome as an error.

mod resume;
mod stream;
mod validation;

pub use resume::partial_size;

use crate::client::NetClient;
use async_trait::async_trait;
use ghfetch_errors::Error;
use ghfetch_events::{DownloadEvent, EventEmitter, EventSender};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// One transfer invocation
#[derive(Clone, PartialEq, Eq)]
pub struct TransferRequest {
    /// Target URL, possibly carrying a credential as userinfo
    pub url: String,
    /// Bytes already present at `output`
    pub resume_offset: u64,
    /// File the body is written to (appended when resuming)
    pub output: PathBuf,
    /// Extra request headers
    pub headers: Vec<(String, String)>,
}

impl TransferRequest {
    pub fn new(url: impl Into<String>, resume_offset: u64, output: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            resume_offset,
            output: output.into(),
            headers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Value of a header, matched case-insensitively
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Debug for TransferRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferRequest")
            .field("url", &crate::redact_url_str(&self.url))
            .field("resume_offset", &self.resume_offset)
            .field("output", &self.output)
            .field("headers", &self.headers)
            .finish()
    }
}

/// What a transfer did to the output file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOutcome {
    /// Bytes written by this invocation
    pub bytes_written: u64,
    /// Size of the output file afterwards
    pub total_size: u64,
    /// The server had nothing past `resume_offset`
    pub already_complete: bool,
}

/// Transport collaborator used by the download strategies
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `request.url` into `request.output`, continuing from
    /// `request.resume_offset`
    async fn transfer(&self, request: &TransferRequest) -> Result<TransferOutcome, Error>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn transfer(&self, request: &TransferRequest) -> Result<TransferOutcome, Error> {
        (**self).transfer(request).await
    }
}

/// reqwest-backed [`Transport`]
#[derive(Clone)]
pub struct HttpTransport {
    client: NetClient,
    chunk_timeout: Duration,
    tx: Option<EventSender>,
}

impl HttpTransport {
    #[must_use]
    pub fn new(client: NetClient) -> Self {
        Self {
            client,
            chunk_timeout: Duration::from_secs(30),
            tx: None,
        }
    }

    /// Abort when no body bytes arrive for this long
    #[must_use]
    pub fn with_chunk_timeout(mut self, chunk_timeout: Duration) -> Self {
        self.chunk_timeout = chunk_timeout;
        self
    }

    /// Report progress on this channel
    #[must_use]
    pub fn with_events(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }
}

impl EventEmitter for HttpTransport {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn transfer(&self, request: &TransferRequest) -> Result<TransferOutcome, Error> {
        let url = validation::validate_url(&request.url)?;
        let display_url = crate::redact_url(&url);
        let resuming = request.resume_offset > 0;

        let range = format!("bytes={}-", request.resume_offset);
        let mut headers: Vec<(&str, &str)> = request
            .headers
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        if resuming {
            headers.push(("Range", range.as_str()));
        }

        tracing::debug!(url = %display_url, offset = request.resume_offset, "starting transfer");
        let response = self.client.get_with_headers(url.as_str(), &headers).await?;

        if resuming && validation::is_range_exhausted(&response) {
            self.emit_download(DownloadEvent::AlreadyComplete {
                url: display_url,
                size: request.resume_offset,
            });
            return Ok(TransferOutcome {
                bytes_written: 0,
                total_size: request.resume_offset,
                already_complete: true,
            });
        }

        validation::validate_response(&response, request.resume_offset)?;

        let params = stream::StreamParams {
            display_url: &display_url,
            resume_offset: request.resume_offset,
            chunk_timeout: self.chunk_timeout,
            events: &self.tx,
        };
        let bytes_written = stream::stream_to_file(response, &request.output, &params).await?;

        Ok(TransferOutcome {
            bytes_written,
            total_size: request.resume_offset + bytes_written,
            already_complete: false,
        })
    }
}
