//! The closed set of download strategies

use crate::pattern::{self, DownloadRequest, GitHubHosts};
use ghfetch_errors::Error;
use std::fmt;

/// `Accept` value that makes the asset endpoint return bytes instead of JSON
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Which URL shape is expected and how it is fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// `https://github.com/{owner}/{repo}/{filepath}`, fetched directly
    RawFile,
    /// `https://github.com/{owner}/{repo}/releases/download/{tag}/{filename}`,
    /// fetched through the asset API
    ReleaseAsset,
}

impl StrategyKind {
    /// Pick the strategy whose URL shape `url` looks like
    ///
    /// This only chooses; a URL that later fails under the chosen strategy is
    /// never retried under the other one.
    #[must_use]
    pub fn detect(url: &str) -> Self {
        if url.contains("/releases/download/") {
            Self::ReleaseAsset
        } else {
            Self::RawFile
        }
    }

    /// Split `url` according to this strategy's pattern
    ///
    /// # Errors
    ///
    /// Returns `GitHubError::InvalidUrlPattern` if the URL does not have the
    /// expected shape.
    pub fn parse_url(self, url: &str, hosts: &GitHubHosts) -> Result<DownloadRequest, Error> {
        match self {
            Self::RawFile => pattern::parse_raw_url(url, hosts),
            Self::ReleaseAsset => pattern::parse_release_url(url, hosts),
        }
    }

    /// Extra request headers the transfer must carry
    #[must_use]
    pub fn transfer_headers(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::RawFile => &[],
            Self::ReleaseAsset => &[("Accept", OCTET_STREAM)],
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RawFile => write!(f, "raw-file"),
            Self::ReleaseAsset => write!(f, "release-asset"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect() {
        assert_eq!(
            StrategyKind::detect("https://github.com/acme/widget/releases/download/v1/a.zip"),
            StrategyKind::ReleaseAsset
        );
        assert_eq!(
            StrategyKind::detect("https://github.com/acme/widget/main/a.zip"),
            StrategyKind::RawFile
        );
    }

    #[test]
    fn test_release_requires_octet_stream() {
        assert!(StrategyKind::RawFile.transfer_headers().is_empty());
        assert_eq!(
            StrategyKind::ReleaseAsset.transfer_headers(),
            &[("Accept", "application/octet-stream")]
        );
    }
}
