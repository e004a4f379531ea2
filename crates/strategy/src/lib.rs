#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Authenticated download strategies for private GitHub content
//!
//! Two strategies share one downloader:
//!
//! - [`StrategyKind::RawFile`] fetches a file from the repository tree by
//!   embedding the token in the web URL.
//! - [`StrategyKind::ReleaseAsset`] resolves the asset id of a release
//!   attachment through the REST API, then fetches it from the asset endpoint
//!   with `Accept: application/octet-stream`.
//!
//! Both verify that the token can see the repository before anything is
//! fetched.
//!
//! ```no_run
//! # async fn run() -> Result<(), ghfetch_errors::Error> {
//! use ghfetch_net::{GitHubClient, HttpTransport, NetClient};
//! use ghfetch_strategy::{GitHubDownloader, StrategyKind};
//! use ghfetch_types::{Credential, DEFAULT_TOKEN_ENV};
//! use url::Url;
//!
//! let credential = Credential::from_env(DEFAULT_TOKEN_ENV);
//! let client = NetClient::with_defaults()?;
//! let api = GitHubClient::new(client.clone(), &Url::parse("https://api.github.com").unwrap())
//!     .with_credential(credential.clone());
//! let transport = HttpTransport::new(client);
//!
//! let url = "https://github.com/acme/widget/releases/download/v1.0/widget.tar.gz";
//! let downloader = GitHubDownloader::builder(api, transport)
//!     .credential(credential)
//!     .build(StrategyKind::detect(url), url)
//!     .await?;
//! downloader.download_to("widget.tar.gz".as_ref()).await?;
//! # Ok(())
//! # }
//! ```

mod downloader;
mod kind;
mod pattern;

pub use downloader::{
    incomplete_path, DownloadResult, DownloaderBuilder, GitHubDownloader, INCOMPLETE_SUFFIX,
};
pub use kind::{StrategyKind, OCTET_STREAM};
pub use pattern::{DownloadRequest, GitHubHosts, Target};
