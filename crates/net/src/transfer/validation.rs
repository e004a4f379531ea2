//! URL validation and HTTP response validation for transfers

use ghfetch_errors::{Error, NetworkError};
use reqwest::{header, StatusCode};
use url::Url;

/// Validate URL and check for supported protocols
pub(super) fn validate_url(url: &str) -> Result<Url, Error> {
    let parsed = Url::parse(url).map_err(|e| NetworkError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(NetworkError::UnsupportedProtocol {
            protocol: scheme.to_string(),
        }
        .into()),
    }
}

/// The server has no bytes past the requested offset
pub(super) fn is_range_exhausted(response: &reqwest::Response) -> bool {
    response.status() == StatusCode::RANGE_NOT_SATISFIABLE
}

/// First byte position of a `Content-Range: bytes {start}-{end}/{total}` value
fn content_range_start(value: &str) -> Option<u64> {
    let range = value.trim().strip_prefix("bytes ")?;
    let (start, _) = range.split_once('-')?;
    start.trim().parse().ok()
}

/// Validate HTTP response for a transfer
///
/// A resumed transfer must answer `206` with a `Content-Range` that starts at
/// `resume_offset`, otherwise the body cannot be appended to the partial file.
pub(super) fn validate_response(
    response: &reqwest::Response,
    resume_offset: u64,
) -> Result<(), Error> {
    let status = response.status();

    if !status.is_success() {
        return Err(NetworkError::HttpError {
            status: status.as_u16(),
            message: status.to_string(),
        }
        .into());
    }

    // A full 200 body on resume would be appended after the bytes we already have
    if resume_offset > 0 {
        if status != StatusCode::PARTIAL_CONTENT {
            return Err(NetworkError::PartialContentNotSupported.into());
        }
        let start = response
            .headers()
            .get(header::CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .and_then(content_range_start);
        if start != Some(resume_offset) {
            tracing::debug!(?start, resume_offset, "partial response starts at the wrong offset");
            return Err(NetworkError::PartialContentNotSupported.into());
        }
    }

    Ok(())
}
