//! GitHub REST metadata queries
//!
//! Only the two lookups the download strategies need are implemented. Status
//! codes map onto [`GitHubError`] so callers can tell "not found" apart from
//! "authentication failed".

use crate::client::NetClient;
use async_trait::async_trait;
use ghfetch_errors::{Error, GitHubError, NetworkError};
use ghfetch_types::{Credential, Release, Repository};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use url::Url;

const ACCEPT_JSON: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";

/// Metadata collaborator used by the download strategies
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// `GET /repos/{owner}/{repo}`
    ///
    /// Fails with [`GitHubError::NotFound`] when the repository is invisible to
    /// the credential and [`GitHubError::AuthenticationFailed`] when the
    /// credential is rejected.
    async fn repository(&self, owner: &str, repo: &str) -> Result<Repository, Error>;

    /// `GET /repos/{owner}/{repo}/releases/tags/{tag}`
    async fn release_by_tag(&self, owner: &str, repo: &str, tag: &str) -> Result<Release, Error>;
}

#[async_trait]
impl<T: GitHubApi + ?Sized> GitHubApi for Arc<T> {
    async fn repository(&self, owner: &str, repo: &str) -> Result<Repository, Error> {
        (**self).repository(owner, repo).await
    }

    async fn release_by_tag(&self, owner: &str, repo: &str, tag: &str) -> Result<Release, Error> {
        (**self).release_by_tag(owner, repo, tag).await
    }
}

/// HTTP implementation of [`GitHubApi`]
#[derive(Clone)]
pub struct GitHubClient {
    client: NetClient,
    api_base: String,
    credential: Option<Credential>,
}

impl GitHubClient {
    #[must_use]
    pub fn new(client: NetClient, api_url: &Url) -> Self {
        Self {
            client,
            api_base: api_url.as_str().trim_end_matches('/').to_string(),
            credential: None,
        }
    }

    /// Sign requests with this credential
    #[must_use]
    pub fn with_credential(mut self, credential: Option<Credential>) -> Self {
        self.credential = credential;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.api_base)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, resource: &str) -> Result<T, Error> {
        let url = self.endpoint(path);
        let authorization = self
            .credential
            .as_ref()
            .map(|c| format!("Bearer {}", c.expose()));

        let mut headers = vec![("Accept", ACCEPT_JSON), ("X-GitHub-Api-Version", API_VERSION)];
        if let Some(value) = authorization.as_deref() {
            headers.push(("Authorization", value));
        }

        tracing::debug!(%url, "GitHub API request");
        let response = self.client.get_with_headers(&url, &headers).await?;
        let status = response.status();

        if status.is_success() {
            let body = response
                .bytes()
                .await
                .map_err(|e| NetworkError::DownloadFailed(e.without_url().to_string()))?;
            return serde_json::from_slice(&body).map_err(|e| {
                GitHubError::InvalidResponse {
                    resource: resource.to_string(),
                    message: e.to_string(),
                }
                .into()
            });
        }

        let message = error_message(response).await;
        Err(match status {
            StatusCode::NOT_FOUND => GitHubError::NotFound {
                resource: resource.to_string(),
            },
            StatusCode::UNAUTHORIZED => GitHubError::AuthenticationFailed { message },
            _ => GitHubError::ApiError {
                status: status.as_u16(),
                resource: resource.to_string(),
                message,
            },
        }
        .into())
    }
}

/// Pull `message` out of a GitHub error body, falling back to the status line
async fn error_message(response: reqwest::Response) -> String {
    let fallback = response.status().to_string();
    match response.json::<serde_json::Value>().await {
        Ok(body) => body
            .get("message")
            .and_then(serde_json::Value::as_str)
            .map_or(fallback, ToString::to_string),
        Err(_) => fallback,
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn repository(&self, owner: &str, repo: &str) -> Result<Repository, Error> {
        self.get_json(
            &format!("repos/{owner}/{repo}"),
            &format!("repository {owner}/{repo}"),
        )
        .await
    }

    async fn release_by_tag(&self, owner: &str, repo: &str, tag: &str) -> Result<Release, Error> {
        self.get_json(
            &format!("repos/{owner}/{repo}/releases/tags/{tag}"),
            &format!("release {tag} of {owner}/{repo}"),
        )
        .await
    }
}
