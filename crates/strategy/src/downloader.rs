//! Authenticated downloader shared by both strategies

use crate::kind::StrategyKind;
use crate::pattern::{with_userinfo, DownloadRequest, GitHubHosts, Target};
use ghfetch_errors::{Error, GitHubError};
use ghfetch_events::{DownloadEvent, EventEmitter, EventSender, GitHubEvent};
use ghfetch_net::{partial_size, GitHubApi, TransferOutcome, TransferRequest, Transport};
use ghfetch_types::{AssetId, Credential, PackageRef, DEFAULT_TOKEN_ENV};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::fs as tokio_fs;
use tokio::sync::OnceCell;

/// Suffix of the partial file `download_to` writes before the final rename
pub const INCOMPLETE_SUFFIX: &str = "incomplete";

/// Result of [`GitHubDownloader::download_to`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadResult {
    pub path: PathBuf,
    pub size: u64,
    /// Bytes that were already on disk before this call
    pub resumed_from: u64,
}

/// Collects what a downloader needs before it can be built
pub struct DownloaderBuilder<A, T> {
    api: A,
    transport: T,
    hosts: GitHubHosts,
    credential: Option<Credential>,
    token_env: String,
    package: PackageRef,
    tx: Option<EventSender>,
}

impl<A: GitHubApi, T: Transport> DownloaderBuilder<A, T> {
    pub fn new(api: A, transport: T) -> Self {
        Self {
            api,
            transport,
            hosts: GitHubHosts::default(),
            credential: None,
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            package: PackageRef::default(),
            tx: None,
        }
    }

    #[must_use]
    pub fn hosts(mut self, hosts: GitHubHosts) -> Self {
        self.hosts = hosts;
        self
    }

    #[must_use]
    pub fn credential(mut self, credential: Option<Credential>) -> Self {
        self.credential = credential;
        self
    }

    /// Name of the environment variable the credential comes from
    #[must_use]
    pub fn token_env(mut self, var: impl Into<String>) -> Self {
        self.token_env = var.into();
        self
    }

    /// Read the credential from the configured environment variable
    #[must_use]
    pub fn credential_from_env(mut self) -> Self {
        self.credential = Credential::from_env(&self.token_env);
        self
    }

    #[must_use]
    pub fn package(mut self, package: PackageRef) -> Self {
        self.package = package;
        self
    }

    #[must_use]
    pub fn events(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Parse `url`, check the credential and verify repository access
    ///
    /// Steps run in order and the first failure aborts: the URL is checked
    /// before the credential, and no request is made without a credential.
    ///
    /// # Errors
    ///
    /// - `GitHubError::InvalidUrlPattern` if `url` does not fit `kind`
    /// - `GitHubError::MissingCredential` if no credential was supplied
    /// - `GitHubError::AccessDenied` if the repository is not visible to the credential
    /// - any other error of the repository query, unchanged
    pub async fn build(self, kind: StrategyKind, url: &str) -> Result<GitHubDownloader<A, T>, Error> {
        let request = kind.parse_url(url, &self.hosts)?;

        let credential = self.credential.ok_or_else(|| GitHubError::MissingCredential {
            var: self.token_env.clone(),
        })?;

        let downloader = GitHubDownloader {
            kind,
            request,
            package: self.package,
            credential,
            hosts: self.hosts,
            api: self.api,
            transport: self.transport,
            asset_id: OnceCell::new(),
            tx: self.tx,
        };
        downloader.validate_access().await?;
        Ok(downloader)
    }
}

/// A validated, ready-to-fetch download
///
/// Only obtainable through [`DownloaderBuilder::build`], so every instance has
/// passed URL parsing, credential and access checks.
pub struct GitHubDownloader<A, T> {
    kind: StrategyKind,
    request: DownloadRequest,
    package: PackageRef,
    credential: Credential,
    hosts: GitHubHosts,
    api: A,
    transport: T,
    asset_id: OnceCell<AssetId>,
    tx: Option<EventSender>,
}

impl<A, T> EventEmitter for GitHubDownloader<A, T> {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }
}

impl<A: GitHubApi, T: Transport> GitHubDownloader<A, T> {
    pub fn builder(api: A, transport: T) -> DownloaderBuilder<A, T> {
        DownloaderBuilder::new(api, transport)
    }

    #[must_use]
    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    #[must_use]
    pub fn request(&self) -> &DownloadRequest {
        &self.request
    }

    #[must_use]
    pub fn package(&self) -> &PackageRef {
        &self.package
    }

    fn package_label(&self) -> Option<String> {
        (!self.package.name.is_empty()).then(|| self.package.to_string())
    }

    async fn validate_access(&self) -> Result<(), Error> {
        let owner = self.request.owner();
        let repo = self.request.repo();
        self.emit_github(GitHubEvent::ValidatingAccess {
            owner: owner.to_string(),
            repo: repo.to_string(),
        });

        match self.api.repository(owner, repo).await {
            Ok(_) => {
                self.emit_github(GitHubEvent::AccessValidated {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                });
                Ok(())
            }
            // Authentication failures are reported by the API client itself
            Err(Error::GitHub(GitHubError::NotFound { .. })) => {
                self.emit_github(GitHubEvent::AccessDenied {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                });
                Err(GitHubError::AccessDenied {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                }
                .into())
            }
            Err(e) => Err(e),
        }
    }

    /// Id of the release asset, looked up once and cached
    ///
    /// # Errors
    ///
    /// Returns `GitHubError::AssetNotFound` if the release has no asset named
    /// like the URL's file name, any error of the release query unchanged,
    /// or an internal error for raw-file downloads, which have no asset.
    pub async fn resolve_asset_id(&self) -> Result<AssetId, Error> {
        let Target::ReleaseAsset { tag, filename } = self.request.target() else {
            return Err(Error::internal(format!(
                "{} downloads have no release asset",
                self.kind
            )));
        };

        self.asset_id
            .get_or_try_init(|| self.lookup_asset_id(tag, filename))
            .await
            .cloned()
    }

    async fn lookup_asset_id(&self, tag: &str, filename: &str) -> Result<AssetId, Error> {
        let owner = self.request.owner();
        let repo = self.request.repo();
        self.emit_github(GitHubEvent::ResolvingAsset {
            owner: owner.to_string(),
            repo: repo.to_string(),
            tag: tag.to_string(),
            filename: filename.to_string(),
        });

        let release = self.api.release_by_tag(owner, repo, tag).await?;
        let matches: Vec<AssetId> = release.assets_named(filename).map(|a| a.id.clone()).collect();

        let Some(asset_id) = matches.first().cloned() else {
            self.emit_github(GitHubEvent::AssetNotFound {
                owner: owner.to_string(),
                repo: repo.to_string(),
                tag: tag.to_string(),
                filename: filename.to_string(),
            });
            return Err(GitHubError::AssetNotFound {
                owner: owner.to_string(),
                repo: repo.to_string(),
                tag: tag.to_string(),
                filename: filename.to_string(),
            }
            .into());
        };

        // First match wins. GitHub rejects duplicate names within a release,
        // so more than one match points at an API change worth surfacing.
        if matches.len() > 1 {
            tracing::warn!(%tag, %filename, count = matches.len(), "duplicate release assets");
            self.emit_github(GitHubEvent::DuplicateAssets {
                tag: tag.to_string(),
                filename: filename.to_string(),
                count: matches.len(),
            });
        }

        self.emit_github(GitHubEvent::AssetResolved {
            owner: owner.to_string(),
            repo: repo.to_string(),
            tag: tag.to_string(),
            filename: filename.to_string(),
            asset_id: asset_id.to_string(),
        });
        Ok(asset_id)
    }

    /// URL the transfer is made against, with the token embedded as userinfo
    ///
    /// For release assets this resolves the asset id if it is not cached yet.
    ///
    /// # Errors
    ///
    /// Returns any error of [`Self::resolve_asset_id`] for release assets.
    pub async fn download_url(&self) -> Result<String, Error> {
        let owner = self.request.owner();
        let repo = self.request.repo();
        match self.request.target() {
            Target::RawFile { filepath } => {
                let base = with_userinfo(self.hosts.web(), &self.credential)?;
                Ok(format!("{base}/{owner}/{repo}/{filepath}"))
            }
            Target::ReleaseAsset { .. } => {
                let asset_id = self.resolve_asset_id().await?;
                let base = with_userinfo(self.hosts.api(), &self.credential)?;
                Ok(format!("{base}/repos/{owner}/{repo}/releases/assets/{asset_id}"))
            }
        }
    }

    /// Fetch into `temporary_path`, continuing after the bytes already there
    ///
    /// Transport errors are returned unchanged; nothing is retried here.
    ///
    /// # Errors
    ///
    /// Returns an error if the partial file cannot be inspected, the download
    /// URL cannot be built, or the transfer fails.
    pub async fn fetch(&self, temporary_path: &Path) -> Result<TransferOutcome, Error> {
        let resume_offset = partial_size(temporary_path).await?;
        let url = self.download_url().await?;

        let mut transfer = TransferRequest::new(url, resume_offset, temporary_path);
        for (name, value) in self.kind.transfer_headers() {
            transfer = transfer.with_header(*name, *value);
        }

        let public_url = self.request.url().to_string();
        if resume_offset > 0 {
            self.emit_download(DownloadEvent::Resuming {
                url: public_url.clone(),
                resume_offset,
            });
        }
        self.emit_download(DownloadEvent::Started {
            url: public_url.clone(),
            package: self.package_label(),
            total_size: None,
        });

        let started = Instant::now();
        match self.transport.transfer(&transfer).await {
            Ok(outcome) => {
                self.emit_download(DownloadEvent::Completed {
                    url: public_url,
                    package: self.package_label(),
                    final_size: outcome.total_size,
                    total_time: started.elapsed(),
                });
                Ok(outcome)
            }
            Err(e) => {
                // Count whatever reached the partial file before the failure
                let bytes_downloaded = partial_size(temporary_path)
                    .await
                    .unwrap_or(resume_offset);
                self.emit_download(DownloadEvent::Failed {
                    url: public_url,
                    package: self.package_label(),
                    error: e.to_string(),
                    bytes_downloaded,
                });
                Err(e)
            }
        }
    }

    /// Fetch into `{dest}.incomplete`, then move the finished file to `dest`
    ///
    /// A leftover `.incomplete` file from an earlier attempt is resumed.
    ///
    /// # Errors
    ///
    /// Returns any error of [`Self::fetch`], or an I/O error if the final
    /// rename fails.
    pub async fn download_to(&self, dest: &Path) -> Result<DownloadResult, Error> {
        let temporary_path = incomplete_path(dest);
        let resumed_from = partial_size(&temporary_path).await?;

        let outcome = self.fetch(&temporary_path).await?;

        tokio_fs::rename(&temporary_path, dest)
            .await
            .map_err(|e| Error::io_with_path(&e, dest))?;

        Ok(DownloadResult {
            path: dest.to_path_buf(),
            size: outcome.total_size,
            resumed_from,
        })
    }
}

/// `{dest}.incomplete`
#[must_use]
pub fn incomplete_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".");
    name.push(INCOMPLETE_SUFFIX);
    PathBuf::from(name)
}
